/// Read-through caching for external lookups.
///
/// Returns the cached value when present. Otherwise awaits `$block`, hands the
/// result to the background writer with the given TTL (seconds) and returns it.
/// Errors from the cache read and from `$block` are propagated with `?`, so
/// the macro must be used inside a function returning `AppResult`.
///
/// # Example
/// ```rust,ignore
/// async fn fetch_video_info(&self, video_id: &str) -> AppResult<VideoInfo> {
///     cached!(self.cache, CacheKey::VideoInfo(video_id.to_string()), 86_400, async move {
///         self.fetch_from_api(video_id).await
///     })
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}

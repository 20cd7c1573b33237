/// External metadata provider abstraction
///
/// The video platform and the film/TV database are consumed read-only behind
/// these traits, so handlers and services never depend on a concrete HTTP
/// client. Each implementation returns fixed placeholder data when it has no
/// API key configured.
use crate::{
    error::AppResult,
    models::{MediaDetails, MediaSummary, MediaType, VideoInfo},
};

pub mod tmdb;
pub mod youtube;

pub use tmdb::TmdbProvider;
pub use youtube::YouTubeProvider;

/// Video platform lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoInfoProvider: Send + Sync {
    /// Fetches title, thumbnail, channel and formatted duration for a video ID
    async fn fetch_video_info(&self, video_id: &str) -> AppResult<VideoInfo>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Film/TV metadata lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaProvider: Send + Sync {
    /// Multi-type title search; only movies and TV shows are returned
    async fn search(&self, query: &str) -> AppResult<Vec<MediaSummary>>;

    /// Details and credits for one title
    async fn details(&self, media_type: MediaType, tmdb_id: u64) -> AppResult<MediaDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

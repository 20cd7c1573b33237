/// YouTube Data API v3 provider
///
/// Looks up a single video by its 11-character ID with
/// `GET /videos?part=snippet,contentDetails` and normalizes the response:
/// the best available thumbnail is chosen and the ISO-8601 duration is
/// rendered as a clock string.
use std::sync::OnceLock;

use regex::Regex;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{VideoInfo, UNKNOWN_DURATION},
    services::providers::VideoInfoProvider,
};

const VIDEO_CACHE_TTL: u64 = 86_400; // 1 day

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
        )
        .expect("video id pattern is valid")
    })
}

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
            .expect("duration pattern is valid")
    })
}

/// Extracts the video ID from a watch, embed, short-link or `v=` URL
pub fn extract_video_id(url: &str) -> Option<String> {
    video_id_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Renders an ISO-8601 duration (`PT1H2M3S`) as `H:MM:SS`, or `M:SS` under an hour
///
/// Days are folded into hours. Returns `None` when the value does not parse
/// or carries no component at all.
pub fn format_iso8601_duration(duration: &str) -> Option<String> {
    let caps = duration_regex().captures(duration.trim())?;

    if (1..=4).all(|i| caps.get(i).is_none()) {
        return None;
    }

    let part = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let total = part(1)?
        .checked_mul(86_400)?
        .checked_add(part(2)?.checked_mul(3_600)?)?
        .checked_add(part(3)?.checked_mul(60)?)?
        .checked_add(part(4)?)?;
    let hours = total / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        Some(format!("{}:{:02}:{:02}", hours, minutes, seconds))
    } else {
        Some(format!("{}:{:02}", minutes, seconds))
    }
}

/// Parses a clock string produced by [`format_iso8601_duration`] back into seconds
///
/// Returns `None` for anything else, including values too large for `u32`.
pub fn parse_clock(clock: &str) -> Option<u32> {
    let parts: Vec<u32> = clock
        .split(':')
        .map(|p| p.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [m, s] => m.checked_mul(60)?.checked_add(*s),
        [h, m, s] => h
            .checked_mul(3_600)?
            .checked_add(m.checked_mul(60)?)?
            .checked_add(*s),
        _ => None,
    }
}

fn fallback_thumbnail(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}

/// Stand-in used when no API key is configured
pub fn placeholder_info(video_id: &str) -> VideoInfo {
    VideoInfo {
        video_id: video_id.to_string(),
        title: format!("Sample video - {}", video_id),
        thumbnail: fallback_thumbnail(video_id),
        channel_title: "Sample channel".to_string(),
        duration: "10:30".to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ApiVideosResponse {
    #[serde(default)]
    items: Vec<ApiVideo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiVideo {
    snippet: ApiSnippet,
    #[serde(default)]
    content_details: Option<ApiContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSnippet {
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: ApiThumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct ApiThumbnails {
    maxres: Option<ApiThumbnail>,
    high: Option<ApiThumbnail>,
    medium: Option<ApiThumbnail>,
    default: Option<ApiThumbnail>,
}

#[derive(Debug, Deserialize)]
struct ApiThumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiContentDetails {
    duration: String,
}

impl ApiThumbnails {
    fn best(self) -> Option<String> {
        self.maxres
            .or(self.high)
            .or(self.medium)
            .or(self.default)
            .map(|t| t.url)
    }
}

impl ApiVideo {
    fn into_info(self, video_id: &str) -> VideoInfo {
        let duration = self
            .content_details
            .and_then(|d| format_iso8601_duration(&d.duration))
            .unwrap_or_else(|| UNKNOWN_DURATION.to_string());

        VideoInfo {
            video_id: video_id.to_string(),
            title: self.snippet.title,
            thumbnail: self
                .snippet
                .thumbnails
                .best()
                .unwrap_or_else(|| fallback_thumbnail(video_id)),
            channel_title: self.snippet.channel_title,
            duration,
        }
    }
}

#[derive(Clone)]
pub struct YouTubeProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    cache: Cache,
}

impl YouTubeProvider {
    pub fn new(cache: Cache, api_key: Option<String>, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    async fn fetch_from_api(&self, api_key: &str, video_id: &str) -> AppResult<VideoInfo> {
        let url = format!("{}/videos", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("id", video_id),
                ("key", api_key),
                ("part", "snippet,contentDetails"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "YouTube API returned status {}: {}",
                status, body
            )));
        }

        let videos: ApiVideosResponse = response.json().await?;
        let video = videos
            .items
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("video {} not found", video_id)))?;

        let info = video.into_info(video_id);

        tracing::info!(
            video_id = %video_id,
            duration = %info.duration,
            provider = "youtube",
            "Video info fetched"
        );

        Ok(info)
    }
}

#[async_trait::async_trait]
impl VideoInfoProvider for YouTubeProvider {
    async fn fetch_video_info(&self, video_id: &str) -> AppResult<VideoInfo> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!(video_id = %video_id, "YouTube API key not configured, using placeholder info");
            return Ok(placeholder_info(video_id));
        };

        cached!(
            self.cache,
            CacheKey::VideoInfo(video_id.to_string()),
            VIDEO_CACHE_TTL,
            async move { self.fetch_from_api(api_key, video_id).await }
        )
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shown in place of a duration the platform did not report in a parseable form
pub const UNKNOWN_DURATION: &str = "--:--";

/// A bookmarked video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub description: String,
    /// Slug of the category the video is filed under
    pub category: String,
    pub favorite: bool,
    pub thumbnail: String,
    /// 11-character platform ID extracted from `url`
    pub video_id: Option<String>,
    pub duration: String,
    pub channel_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of a video, as submitted by the client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInput {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub channel_title: String,
}

impl Video {
    /// Creates a new video from validated input
    pub fn new(input: VideoInput, video_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            url: input.url,
            description: input.description,
            category: input.category,
            favorite: input.favorite,
            thumbnail: input.thumbnail,
            video_id,
            duration: input.duration,
            channel_title: input.channel_title,
            created_at: now,
            updated_at: now,
        }
    }

    /// Player URL for the embedded video, when the platform ID is known
    pub fn embed_url(&self) -> Option<String> {
        self.video_id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/embed/{}", id))
    }
}

/// Video info looked up from the platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub channel_title: String,
    pub duration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> VideoInput {
        VideoInput {
            title: "Rust in 100 seconds".to_string(),
            url: "https://youtu.be/5C_HPTJg5ek".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_embed_url() {
        let video = Video::new(input(), Some("5C_HPTJg5ek".to_string()));
        assert_eq!(
            video.embed_url().as_deref(),
            Some("https://www.youtube.com/embed/5C_HPTJg5ek")
        );
    }

    #[test]
    fn test_embed_url_without_video_id() {
        let video = Video::new(input(), None);
        assert_eq!(video.embed_url(), None);
        assert_eq!(video.created_at, video.updated_at);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use super::{MediaDetails, MediaType};

/// Viewing progress of a watchlist entry
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    #[default]
    PlanToWatch,
    Watching,
    Completed,
    Dropped,
}

impl WatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::PlanToWatch => "plan_to_watch",
            WatchStatus::Watching => "watching",
            WatchStatus::Completed => "completed",
            WatchStatus::Dropped => "dropped",
        }
    }
}

impl Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plan_to_watch" => Ok(WatchStatus::PlanToWatch),
            "watching" => Ok(WatchStatus::Watching),
            "completed" => Ok(WatchStatus::Completed),
            "dropped" => Ok(WatchStatus::Dropped),
            other => Err(format!("unknown watch status '{}'", other)),
        }
    }
}

/// A movie or TV show on the watchlist, with a snapshot of its metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistItem {
    pub id: Uuid,
    pub tmdb_id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub release_year: Option<i32>,
    pub genres: Vec<String>,
    pub status: WatchStatus,
    /// Personal rating on a 0-10 scale
    pub rating: Option<f32>,
    pub favorite: bool,
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WatchlistItem {
    /// Snapshots looked-up details into a new entry
    pub fn from_details(details: MediaDetails, status: WatchStatus) -> Self {
        let now = Utc::now();
        let summary = details.summary;
        Self {
            id: Uuid::new_v4(),
            tmdb_id: summary.tmdb_id,
            media_type: summary.media_type,
            title: summary.title,
            original_title: summary.original_title,
            overview: summary.overview,
            poster_url: summary.poster_url,
            release_year: summary.release_year,
            genres: summary.genres,
            status,
            rating: None,
            favorite: false,
            notes: None,
            added_at: now,
            updated_at: now,
        }
    }
}

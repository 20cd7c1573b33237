//! reel-shelf: a personal media catalog service.
//!
//! Two catalogs share one API: video bookmarks filed under categories and
//! enriched from YouTube, and a movie/TV watchlist backed by TMDB metadata.
//! Anyone may read; only the configured administrator may write.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{create_router, AppState};

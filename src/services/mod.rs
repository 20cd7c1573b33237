pub mod catalog;
pub mod filter;
pub mod genres;
pub mod providers;
pub mod watchlist;

pub use providers::{MediaProvider, TmdbProvider, VideoInfoProvider, YouTubeProvider};

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Category, Video, WatchlistItem},
};

/// Persistence for the video and watchlist catalogs
///
/// Backends keep insertion order for every listing: categories in the order
/// they were created, videos and watchlist items oldest first. Business rules
/// (admin gating, validation, category reassignment policy) live in the
/// services layer, not here.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_videos(&self) -> AppResult<Vec<Video>>;

    async fn get_video(&self, id: Uuid) -> AppResult<Option<Video>>;

    async fn insert_video(&self, video: &Video) -> AppResult<()>;

    /// Replaces a stored video; returns false when no video has this ID
    async fn update_video(&self, video: &Video) -> AppResult<bool>;

    async fn delete_video(&self, id: Uuid) -> AppResult<bool>;

    /// Moves every video filed under `from` to `to`, returning how many moved
    async fn reassign_category(&self, from: &str, to: &str) -> AppResult<u64>;

    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// Fails with `Conflict` when the slug is already taken
    async fn insert_category(&self, category: &Category) -> AppResult<()>;

    async fn delete_category(&self, id: Uuid) -> AppResult<bool>;

    async fn clear_categories(&self) -> AppResult<()>;

    async fn list_watchlist(&self) -> AppResult<Vec<WatchlistItem>>;

    async fn get_watchlist_item(&self, id: Uuid) -> AppResult<Option<WatchlistItem>>;

    /// Fails with `Conflict` when the title is already on the watchlist
    async fn insert_watchlist_item(&self, item: &WatchlistItem) -> AppResult<()>;

    async fn update_watchlist_item(&self, item: &WatchlistItem) -> AppResult<bool>;

    async fn delete_watchlist_item(&self, id: Uuid) -> AppResult<bool>;
}

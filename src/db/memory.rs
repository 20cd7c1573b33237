use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{Category, Video, WatchlistItem},
};

/// Process-local store used when no database is configured, and in tests
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    videos: Vec<Video>,
    categories: Vec<Category>,
    watchlist: Vec<WatchlistItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn list_videos(&self) -> AppResult<Vec<Video>> {
        Ok(self.inner.read().await.videos.clone())
    }

    async fn get_video(&self, id: Uuid) -> AppResult<Option<Video>> {
        let inner = self.inner.read().await;
        Ok(inner.videos.iter().find(|v| v.id == id).cloned())
    }

    async fn insert_video(&self, video: &Video) -> AppResult<()> {
        self.inner.write().await.videos.push(video.clone());
        Ok(())
    }

    async fn update_video(&self, video: &Video) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.videos.iter_mut().find(|v| v.id == video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_video(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.videos.len();
        inner.videos.retain(|v| v.id != id);
        Ok(inner.videos.len() != before)
    }

    async fn reassign_category(&self, from: &str, to: &str) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let mut moved = 0;
        for video in inner.videos.iter_mut().filter(|v| v.category == from) {
            video.category = to.to_string();
            moved += 1;
        }
        Ok(moved)
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(self.inner.read().await.categories.clone())
    }

    async fn insert_category(&self, category: &Category) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.categories.iter().any(|c| c.slug == category.slug) {
            return Err(AppError::Conflict(format!(
                "category '{}' already exists",
                category.slug
            )));
        }
        inner.categories.push(category.clone());
        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.categories.len();
        inner.categories.retain(|c| c.id != id);
        Ok(inner.categories.len() != before)
    }

    async fn clear_categories(&self) -> AppResult<()> {
        self.inner.write().await.categories.clear();
        Ok(())
    }

    async fn list_watchlist(&self) -> AppResult<Vec<WatchlistItem>> {
        Ok(self.inner.read().await.watchlist.clone())
    }

    async fn get_watchlist_item(&self, id: Uuid) -> AppResult<Option<WatchlistItem>> {
        let inner = self.inner.read().await;
        Ok(inner.watchlist.iter().find(|i| i.id == id).cloned())
    }

    async fn insert_watchlist_item(&self, item: &WatchlistItem) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner
            .watchlist
            .iter()
            .any(|i| i.tmdb_id == item.tmdb_id && i.media_type == item.media_type)
        {
            return Err(AppError::Conflict(format!(
                "{} {} is already on the watchlist",
                item.media_type, item.tmdb_id
            )));
        }
        inner.watchlist.push(item.clone());
        Ok(())
    }

    async fn update_watchlist_item(&self, item: &WatchlistItem) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.watchlist.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_watchlist_item(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.watchlist.len();
        inner.watchlist.retain(|i| i.id != id);
        Ok(inner.watchlist.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VideoInput;

    fn video(title: &str, category: &str) -> Video {
        Video::new(
            VideoInput {
                title: title.to_string(),
                url: "https://example.com".to_string(),
                category: category.to_string(),
                ..Default::default()
            },
            None,
        )
    }

    #[tokio::test]
    async fn test_duplicate_category_slug_conflicts() {
        let store = MemoryStore::new();
        store.insert_category(&Category::new("Music")).await.unwrap();

        let result = store.insert_category(&Category::new("music")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.list_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reassign_category_moves_only_matching_videos() {
        let store = MemoryStore::new();
        store.insert_video(&video("a", "music")).await.unwrap();
        store.insert_video(&video("b", "tech")).await.unwrap();
        store.insert_video(&video("c", "music")).await.unwrap();

        let moved = store.reassign_category("music", "tutorial").await.unwrap();
        assert_eq!(moved, 2);

        let categories: Vec<String> = store
            .list_videos()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.category)
            .collect();
        assert_eq!(categories, vec!["tutorial", "tech", "tutorial"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_video() {
        let store = MemoryStore::new();
        let v = video("ghost", "");
        assert!(!store.update_video(&v).await.unwrap());
        assert!(!store.delete_video(v.id).await.unwrap());
    }
}

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{Category, Video, VideoInfo, VideoInput, DEFAULT_CATEGORIES},
    services::{
        filter::{filter_videos, VideoFilter},
        providers::{youtube::extract_video_id, VideoInfoProvider},
    },
};

/// Outcome of removing a category
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryDeletion {
    pub deleted: Category,
    pub reassigned_to: String,
    pub reassigned_videos: u64,
}

pub async fn list_videos(store: &dyn CatalogStore, filter: &VideoFilter) -> AppResult<Vec<Video>> {
    let videos = store.list_videos().await?;
    Ok(filter_videos(videos, filter))
}

pub async fn get_video(store: &dyn CatalogStore, id: Uuid) -> AppResult<Video> {
    store
        .get_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("video {} not found", id)))
}

/// Resolves a pasted URL to platform info, as the add form does on input
pub async fn lookup_video(provider: &dyn VideoInfoProvider, url: &str) -> AppResult<VideoInfo> {
    let video_id = extract_video_id(url)
        .ok_or_else(|| AppError::InvalidInput(format!("no video ID found in '{}'", url)))?;
    provider.fetch_video_info(&video_id).await
}

/// Validates input, resolves its category and fills platform fields left blank
async fn prepare_video(
    store: &dyn CatalogStore,
    provider: &dyn VideoInfoProvider,
    mut input: VideoInput,
) -> AppResult<(VideoInput, Option<String>)> {
    input.title = input.title.trim().to_string();
    input.url = input.url.trim().to_string();

    if input.title.is_empty() || input.url.is_empty() {
        return Err(AppError::InvalidInput(
            "title and url are required".to_string(),
        ));
    }

    let categories = store.list_categories().await?;
    if input.category.is_empty() {
        input.category = categories
            .first()
            .map(|c| c.slug.clone())
            .unwrap_or_default();
    } else if !categories.iter().any(|c| c.slug == input.category) {
        return Err(AppError::InvalidInput(format!(
            "unknown category '{}'",
            input.category
        )));
    }

    let video_id = extract_video_id(&input.url);

    let needs_info = input.thumbnail.is_empty()
        || input.channel_title.is_empty()
        || input.duration.is_empty();

    if let (Some(id), true) = (video_id.as_deref(), needs_info) {
        match provider.fetch_video_info(id).await {
            Ok(info) => {
                if input.thumbnail.is_empty() {
                    input.thumbnail = info.thumbnail;
                }
                if input.channel_title.is_empty() {
                    input.channel_title = info.channel_title;
                }
                if input.duration.is_empty() {
                    input.duration = info.duration;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, video_id = %id, "Video info lookup failed, saving without it");
            }
        }
    }

    Ok((input, video_id))
}

pub async fn add_video(
    store: &dyn CatalogStore,
    provider: &dyn VideoInfoProvider,
    input: VideoInput,
) -> AppResult<Video> {
    let (input, video_id) = prepare_video(store, provider, input).await?;
    let video = Video::new(input, video_id);
    store.insert_video(&video).await?;

    tracing::info!(id = %video.id, category = %video.category, "Video added");
    Ok(video)
}

/// Replaces every editable field of a video, keeping its ID and creation time
pub async fn update_video(
    store: &dyn CatalogStore,
    provider: &dyn VideoInfoProvider,
    id: Uuid,
    input: VideoInput,
) -> AppResult<Video> {
    let existing = get_video(store, id).await?;
    let (input, video_id) = prepare_video(store, provider, input).await?;

    let video = Video {
        id: existing.id,
        title: input.title,
        url: input.url,
        description: input.description,
        category: input.category,
        favorite: input.favorite,
        thumbnail: input.thumbnail,
        video_id,
        duration: input.duration,
        channel_title: input.channel_title,
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };

    if !store.update_video(&video).await? {
        return Err(AppError::NotFound(format!("video {} not found", id)));
    }

    tracing::info!(id = %video.id, "Video updated");
    Ok(video)
}

pub async fn delete_video(store: &dyn CatalogStore, id: Uuid) -> AppResult<()> {
    if !store.delete_video(id).await? {
        return Err(AppError::NotFound(format!("video {} not found", id)));
    }
    tracing::info!(id = %id, "Video deleted");
    Ok(())
}

pub async fn toggle_video_favorite(store: &dyn CatalogStore, id: Uuid) -> AppResult<Video> {
    let mut video = get_video(store, id).await?;
    video.favorite = !video.favorite;
    video.updated_at = Utc::now();

    if !store.update_video(&video).await? {
        return Err(AppError::NotFound(format!("video {} not found", id)));
    }
    Ok(video)
}

pub async fn list_categories(store: &dyn CatalogStore) -> AppResult<Vec<Category>> {
    store.list_categories().await
}

pub async fn add_category(store: &dyn CatalogStore, name: &str) -> AppResult<Category> {
    let category = Category::new(name);
    if category.slug.is_empty() {
        return Err(AppError::InvalidInput(
            "category name cannot be empty".to_string(),
        ));
    }

    store.insert_category(&category).await?;
    tracing::info!(slug = %category.slug, "Category added");
    Ok(category)
}

/// Removes a category and moves its videos to the first remaining category
///
/// Videos are moved before the row is deleted, so a failed move leaves the
/// category in place. The last category can never be removed.
pub async fn delete_category(store: &dyn CatalogStore, slug: &str) -> AppResult<CategoryDeletion> {
    let categories = store.list_categories().await?;

    let target = categories
        .iter()
        .find(|c| c.slug == slug)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("category '{}' not found", slug)))?;

    let replacement = categories
        .iter()
        .find(|c| c.id != target.id)
        .map(|c| c.slug.clone())
        .ok_or_else(|| {
            AppError::InvalidInput("the last remaining category cannot be deleted".to_string())
        })?;

    let moved = store.reassign_category(&target.slug, &replacement).await?;
    store.delete_category(target.id).await?;

    tracing::info!(
        slug = %target.slug,
        reassigned_to = %replacement,
        reassigned_videos = moved,
        "Category deleted"
    );

    Ok(CategoryDeletion {
        deleted: target,
        reassigned_to: replacement,
        reassigned_videos: moved,
    })
}

/// Drops every category and recreates the defaults; videos keep their slugs
pub async fn reset_categories(store: &dyn CatalogStore) -> AppResult<Vec<Category>> {
    store.clear_categories().await?;

    for (slug, name) in DEFAULT_CATEGORIES {
        store
            .insert_category(&Category::with_slug(slug.to_string(), name.to_string()))
            .await?;
    }

    tracing::info!(count = DEFAULT_CATEGORIES.len(), "Categories reset to defaults");
    store.list_categories().await
}

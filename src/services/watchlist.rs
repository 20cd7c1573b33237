use chrono::Utc;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{MediaType, WatchStatus, WatchlistItem},
    services::{
        filter::{filter_watchlist, WatchlistFilter},
        providers::MediaProvider,
    },
};

const MAX_RATING: f32 = 10.0;

#[derive(Debug, Clone, Deserialize)]
pub struct AddToWatchlist {
    pub tmdb_id: u64,
    pub media_type: MediaType,
    #[serde(default)]
    pub status: Option<WatchStatus>,
}

/// Partial update of the personal fields of an entry
///
/// `rating` distinguishes an absent field (left unchanged) from `null`
/// (cleared).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchlistUpdate {
    #[serde(default)]
    pub status: Option<WatchStatus>,
    #[serde(default, deserialize_with = "present")]
    pub rating: Option<Option<f32>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub favorite: Option<bool>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub async fn list(store: &dyn CatalogStore, filter: &WatchlistFilter) -> AppResult<Vec<WatchlistItem>> {
    filter.validate()?;
    let items = store.list_watchlist().await?;
    Ok(filter_watchlist(items, filter))
}

pub async fn get(store: &dyn CatalogStore, id: Uuid) -> AppResult<WatchlistItem> {
    store
        .get_watchlist_item(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("watchlist item {} not found", id)))
}

/// Looks the title up and stores a snapshot of its metadata
pub async fn add(
    store: &dyn CatalogStore,
    provider: &dyn MediaProvider,
    request: AddToWatchlist,
) -> AppResult<WatchlistItem> {
    let existing = store.list_watchlist().await?;
    if existing
        .iter()
        .any(|i| i.tmdb_id == request.tmdb_id && i.media_type == request.media_type)
    {
        return Err(AppError::Conflict(format!(
            "{} {} is already on the watchlist",
            request.media_type, request.tmdb_id
        )));
    }

    let details = provider
        .details(request.media_type, request.tmdb_id)
        .await?;
    let item = WatchlistItem::from_details(details, request.status.unwrap_or_default());
    store.insert_watchlist_item(&item).await?;

    tracing::info!(
        id = %item.id,
        tmdb_id = item.tmdb_id,
        media_type = %item.media_type,
        "Added to watchlist"
    );
    Ok(item)
}

pub async fn update(
    store: &dyn CatalogStore,
    id: Uuid,
    update: WatchlistUpdate,
) -> AppResult<WatchlistItem> {
    let mut item = get(store, id).await?;

    if let Some(Some(rating)) = update.rating {
        if !(0.0..=MAX_RATING).contains(&rating) {
            return Err(AppError::InvalidInput(format!(
                "rating must be between 0 and {}",
                MAX_RATING
            )));
        }
    }

    if let Some(status) = update.status {
        item.status = status;
    }
    if let Some(rating) = update.rating {
        item.rating = rating;
    }
    if let Some(notes) = update.notes {
        let notes = notes.trim();
        item.notes = (!notes.is_empty()).then(|| notes.to_string());
    }
    if let Some(favorite) = update.favorite {
        item.favorite = favorite;
    }
    item.updated_at = Utc::now();

    save(store, &item).await?;
    Ok(item)
}

pub async fn toggle_favorite(store: &dyn CatalogStore, id: Uuid) -> AppResult<WatchlistItem> {
    let mut item = get(store, id).await?;
    item.favorite = !item.favorite;
    item.updated_at = Utc::now();
    save(store, &item).await?;
    Ok(item)
}

pub async fn remove(store: &dyn CatalogStore, id: Uuid) -> AppResult<()> {
    if !store.delete_watchlist_item(id).await? {
        return Err(AppError::NotFound(format!("watchlist item {} not found", id)));
    }
    tracing::info!(id = %id, "Removed from watchlist");
    Ok(())
}

async fn save(store: &dyn CatalogStore, item: &WatchlistItem) -> AppResult<()> {
    if !store.update_watchlist_item(item).await? {
        return Err(AppError::NotFound(format!(
            "watchlist item {} not found",
            item.id
        )));
    }
    Ok(())
}

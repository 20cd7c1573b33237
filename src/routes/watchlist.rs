use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::{AdminViewer, RequestId},
    models::WatchlistItem,
    routes::AppState,
    services::{
        filter::WatchlistFilter,
        watchlist::{self, AddToWatchlist, WatchlistUpdate},
    },
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<WatchlistFilter>,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    Ok(Json(watchlist::list(state.store.as_ref(), &filter).await?))
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WatchlistItem>> {
    Ok(Json(watchlist::get(state.store.as_ref(), id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<AddToWatchlist>,
) -> AppResult<(StatusCode, Json<WatchlistItem>)> {
    tracing::info!(
        request_id = %request_id,
        tmdb_id = request.tmdb_id,
        media_type = %request.media_type,
        "Adding title to watchlist"
    );

    let item = watchlist::add(
        state.store.as_ref(),
        state.media_provider.as_ref(),
        request,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
    Path(id): Path<Uuid>,
    Json(update): Json<WatchlistUpdate>,
) -> AppResult<Json<WatchlistItem>> {
    Ok(Json(watchlist::update(state.store.as_ref(), id, update).await?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    watchlist::remove(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WatchlistItem>> {
    Ok(Json(watchlist::toggle_favorite(state.store.as_ref(), id).await?))
}

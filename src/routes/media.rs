use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{MediaDetails, MediaSummary, MediaType},
    routes::AppState,
    services::genres::{genres_for, Genre},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    media_type: MediaType,
}

/// Handler for multi-type title search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<MediaSummary>>> {
    let titles = state.media_provider.search(&params.q).await?;
    Ok(Json(titles))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path((media_type, id)): Path<(MediaType, u64)>,
) -> AppResult<Json<MediaDetails>> {
    Ok(Json(state.media_provider.details(media_type, id).await?))
}

pub async fn genres(Query(params): Query<GenreQuery>) -> Json<Vec<Genre>> {
    Json(genres_for(params.media_type))
}

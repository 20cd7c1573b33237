use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::{AdminViewer, RequestId},
    models::{Video, VideoInfo, VideoInput},
    routes::AppState,
    services::{catalog, filter::VideoFilter},
};

#[derive(Debug, Serialize)]
pub struct VideoResponse {
    #[serde(flatten)]
    pub video: Video,
    pub embed_url: Option<String>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        let embed_url = video.embed_url();
        Self { video, embed_url }
    }
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    url: String,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<VideoFilter>,
) -> AppResult<Json<Vec<VideoResponse>>> {
    let videos = catalog::list_videos(state.store.as_ref(), &filter).await?;
    Ok(Json(videos.into_iter().map(VideoResponse::from).collect()))
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VideoResponse>> {
    let video = catalog::get_video(state.store.as_ref(), id).await?;
    Ok(Json(video.into()))
}

/// Platform info for a pasted URL, used to pre-fill the add form
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupQuery>,
) -> AppResult<Json<VideoInfo>> {
    let info = catalog::lookup_video(state.video_provider.as_ref(), &params.url).await?;
    Ok(Json(info))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
    Extension(request_id): Extension<RequestId>,
    Json(input): Json<VideoInput>,
) -> AppResult<(StatusCode, Json<VideoResponse>)> {
    tracing::info!(request_id = %request_id, url = %input.url, "Adding video");

    let video = catalog::add_video(
        state.store.as_ref(),
        state.video_provider.as_ref(),
        input,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(video.into())))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
    Path(id): Path<Uuid>,
    Json(input): Json<VideoInput>,
) -> AppResult<Json<VideoResponse>> {
    let video = catalog::update_video(
        state.store.as_ref(),
        state.video_provider.as_ref(),
        id,
        input,
    )
    .await?;

    Ok(Json(video.into()))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    catalog::delete_video(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VideoResponse>> {
    let video = catalog::toggle_video_favorite(state.store.as_ref(), id).await?;
    Ok(Json(video.into()))
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::AdminViewer,
    models::Category,
    routes::AppState,
    services::catalog::{self, CategoryDeletion},
};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(catalog::list_categories(state.store.as_ref()).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
    Json(request): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = catalog::add_category(state.store.as_ref(), &request.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
    Path(slug): Path<String>,
) -> AppResult<Json<CategoryDeletion>> {
    Ok(Json(catalog::delete_category(state.store.as_ref(), &slug).await?))
}

/// Development helper: replace all categories with the defaults
pub async fn reset(
    State(state): State<Arc<AppState>>,
    _admin: AdminViewer,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(catalog::reset_categories(state.store.as_ref()).await?))
}

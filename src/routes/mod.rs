use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::CatalogStore,
    middleware::{identity_middleware, make_span_with_request_id, request_id_middleware},
    services::{MediaProvider, VideoInfoProvider},
};

pub mod categories;
pub mod media;
pub mod session;
pub mod videos;
pub mod watchlist;

/// Shared application state handed to every handler
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub video_provider: Arc<dyn VideoInfoProvider>,
    pub media_provider: Arc<dyn MediaProvider>,
    /// The only account allowed to modify the catalogs
    pub admin_email: Option<String>,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(from_fn_with_state(state.clone(), identity_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session", get(session::current))
        // Video bookmarks
        .route("/videos", get(videos::list).post(videos::create))
        .route("/videos/lookup", get(videos::lookup))
        .route(
            "/videos/:id",
            get(videos::show).put(videos::update).delete(videos::remove),
        )
        .route("/videos/:id/favorite", post(videos::toggle_favorite))
        // Categories
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/reset", post(categories::reset))
        .route("/categories/:slug", axum::routing::delete(categories::remove))
        // Film/TV metadata
        .route("/media/search", get(media::search))
        .route("/media/:media_type/:id", get(media::details))
        .route("/genres", get(media::genres))
        // Watchlist
        .route("/watchlist", get(watchlist::list).post(watchlist::create))
        .route(
            "/watchlist/:id",
            get(watchlist::show)
                .patch(watchlist::update)
                .delete(watchlist::remove),
        )
        .route("/watchlist/:id/favorite", post(watchlist::toggle_favorite))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

use axum::{Extension, Json};
use serde::Serialize;

use crate::models::Viewer;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub signed_in: bool,
    #[serde(flatten)]
    pub viewer: Viewer,
}

/// Who the caller is and whether they may edit
pub async fn current(Extension(viewer): Extension<Viewer>) -> Json<SessionResponse> {
    Json(SessionResponse {
        signed_in: viewer.signed_in(),
        viewer,
    })
}

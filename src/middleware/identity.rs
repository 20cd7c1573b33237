use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, AppResult},
    models::Viewer,
    routes::AppState,
};

/// Verified email forwarded by the authenticating proxy
pub const USER_EMAIL_HEADER: &str = "x-user-email";
/// Display name forwarded by the authenticating proxy
pub const USER_NAME_HEADER: &str = "x-user-name";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Builds the viewer from proxy headers; only an exact match of the admin email is admin
pub fn resolve_viewer(headers: &HeaderMap, admin_email: Option<&str>) -> Viewer {
    let email = header_value(headers, USER_EMAIL_HEADER);
    let is_admin = match (email.as_deref(), admin_email) {
        (Some(email), Some(admin)) => email == admin,
        _ => false,
    };

    Viewer {
        display_name: header_value(headers, USER_NAME_HEADER),
        email,
        is_admin,
    }
}

impl Viewer {
    /// Gate for every catalog mutation
    pub fn require_admin(&self) -> AppResult<()> {
        match (&self.email, self.is_admin) {
            (None, _) => Err(AppError::Unauthorized),
            (Some(_), false) => Err(AppError::Forbidden(
                "only the administrator can modify the catalog".to_string(),
            )),
            (Some(_), true) => Ok(()),
        }
    }
}

/// Extractor admitting only the administrator
///
/// Built from request parts, so listing it before `Path` or `Json` rejects
/// the caller before the path or body is parsed.
#[derive(Debug, Clone)]
pub struct AdminViewer(pub Viewer);

#[async_trait]
impl<S> FromRequestParts<S> for AdminViewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let viewer = parts
            .extensions
            .get::<Viewer>()
            .cloned()
            .unwrap_or_default();
        viewer.require_admin()?;
        Ok(Self(viewer))
    }
}

/// Resolves the [`Viewer`] and stores it in the request extensions
pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let viewer = resolve_viewer(request.headers(), state.admin_email.as_deref());
    if let Some(email) = viewer.email.as_deref() {
        tracing::debug!(email = %email, is_admin = viewer.is_admin, "Viewer identified");
    }
    request.extensions_mut().insert(viewer);
    next.run(request).await
}

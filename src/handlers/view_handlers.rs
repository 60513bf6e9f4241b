//! The application entrypoint handler: resolves which of the three views
//! a request lands on and materializes it as JSON.

use crate::{
    errors::AppError,
    extract::OptionalRequester,
    handlers::AppState,
    views::{ViewState, resolve_view},
};
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

/// Query parameters the entrypoint understands.
#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    /// Raw folder id from a share link. Its presence alone switches the
    /// request into portal mode; it is not validated here.
    pub folder: Option<String>,
}

/// GET `/` — the application entrypoint.
///
/// A share link (`/?folder=<id>`) always opens the public portal,
/// session or not. Otherwise a signed-in requester gets their dashboard
/// and everyone else the login view.
pub async fn app_view(
    State(state): State<AppState>,
    OptionalRequester(user): OptionalRequester,
    Query(query): Query<ViewQuery>,
) -> Result<impl IntoResponse, AppError> {
    let authenticated = user.is_some();

    match resolve_view(query.folder.as_deref(), authenticated) {
        ViewState::Portal => {
            let folder = query.folder.unwrap_or_default();
            let photos = state.access.resolve_portal_access(&folder).await?;
            Ok(Json(json!({
                "view": ViewState::Portal,
                "folder": folder,
                "photos": photos,
            })))
        }
        ViewState::Dashboard => {
            // resolve_view only picks the dashboard for a live session.
            let Some(user) = user else {
                return Ok(Json(json!({ "view": ViewState::Unauthenticated })));
            };
            let folders = state.access.list_owned_folders(Some(user.id)).await?;
            Ok(Json(json!({
                "view": ViewState::Dashboard,
                "user": user,
                "folders": folders,
            })))
        }
        ViewState::Unauthenticated => Ok(Json(json!({ "view": ViewState::Unauthenticated }))),
    }
}

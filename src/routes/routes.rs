//! Defines routes for the service's three surfaces.
//!
//! ## Structure
//! - **Application entrypoint**
//!   - `GET /` — view resolution: portal when `?folder=<id>` is present,
//!     dashboard for a signed-in requester, the login view otherwise
//!
//! - **Owner API** (bearer session required except where noted)
//!   - `POST /api/auth/register` — create an account and sign it in
//!   - `POST /api/auth/login` — sign in
//!   - `POST /api/auth/logout` — sign out (no session required)
//!   - `GET  /api/auth/me` — current user
//!   - `GET  /api/folders` — owned folders (anonymous gets an empty list)
//!   - `POST /api/folders` — create a folder
//!   - `GET  /api/folders/{id}/photos` — owner's photo listing
//!   - `POST /api/folders/{id}/photos` — multipart photo upload
//!   - `POST /api/folders/{id}/link` — generate the public share link
//!
//! - **Public portal** (no authentication by design)
//!   - `GET /portal/{folder_id}/{filename}` — stream a photo's bytes

use crate::handlers::{
    AppState,
    auth_handlers::{login, logout, me, register},
    folder_handlers::{create_folder, generate_link, list_folder_photos, list_folders, upload_photo},
    health_handlers::{healthz, readyz},
    portal_handlers::download_photo,
    view_handlers::app_view,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Build and return the router for every route the service exposes.
///
/// The router carries shared state (`AppState`) to all handlers.
/// `max_upload_bytes` raises the body limit on the photo upload route;
/// everything else keeps axum's default.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        // application entrypoint
        .route("/", get(app_view))
        // health endpoints
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // authentication
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        // folder management
        .route("/api/folders", get(list_folders).post(create_folder))
        .route(
            "/api/folders/{id}/photos",
            get(list_folder_photos)
                .post(upload_photo)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/folders/{id}/link", post(generate_link))
        // public portal
        .route("/portal/{folder_id}/{filename}", get(download_photo))
}

//! Folder management handlers: the owner's side of the system. Creating
//! folders, listing them, uploading photos, generating share links, and
//! the owner's direct photo listing.

use crate::{
    errors::AppError,
    extract::{OptionalRequester, Requester},
    handlers::AppState,
    models::folder::Folder,
    services::access_control::PhotoListing,
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use futures::StreamExt;
use serde::Deserialize;
use std::io;
use uuid::Uuid;

/// Request body for folder creation.
#[derive(Debug, Deserialize)]
pub struct CreateFolderReq {
    pub name: String,
}

/// POST `/api/folders` — create a folder owned by the requester.
pub async fn create_folder(
    State(state): State<AppState>,
    Requester { user }: Requester,
    Json(req): Json<CreateFolderReq>,
) -> Result<impl IntoResponse, AppError> {
    let folder = state.access.create_folder(user.id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// GET `/api/folders` — every folder owned by the requester.
///
/// Anonymous requests get an empty list, not a rejection: the listing is
/// defined as "folders of the current requester", and an absent
/// requester owns nothing.
pub async fn list_folders(
    State(state): State<AppState>,
    OptionalRequester(user): OptionalRequester,
) -> Result<Json<Vec<Folder>>, AppError> {
    let folders = state.access.list_owned_folders(user.map(|u| u.id)).await?;
    Ok(Json(folders))
}

/// POST `/api/folders/{id}/photos` — multipart photo upload.
///
/// Streams the first multipart part that carries a filename into the
/// folder; any other parts in the form are ignored.
pub async fn upload_photo(
    State(state): State<AppState>,
    Requester { user }: Requester,
    Path(folder_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("invalid multipart body: {}", err)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        let stream = field.map(|chunk| chunk.map_err(|err| io::Error::new(io::ErrorKind::Other, err)));
        let photo = state
            .access
            .upload_photo(user.id, folder_id, &filename, content_type, stream)
            .await?;

        return Ok((StatusCode::CREATED, Json(photo)));
    }

    Err(AppError::bad_request("no file part in upload"))
}

/// POST `/api/folders/{id}/link` — generate the folder's public share
/// link and return the updated record.
///
/// Idempotent for practical purposes: the link is derived from the
/// folder id, so regenerating yields the same URL and links already
/// handed out keep working.
pub async fn generate_link(
    State(state): State<AppState>,
    Requester { user }: Requester,
    Path(folder_id): Path<Uuid>,
) -> Result<Json<Folder>, AppError> {
    let folder = state.access.grant_public_link(user.id, folder_id).await?;
    Ok(Json(folder))
}

/// GET `/api/folders/{id}/photos` — the owner's direct photo listing,
/// resolved to the same download URLs the public portal serves.
pub async fn list_folder_photos(
    State(state): State<AppState>,
    Requester { user }: Requester,
    Path(folder_id): Path<Uuid>,
) -> Result<Json<Vec<PhotoListing>>, AppError> {
    let photos = state.access.list_folder_photos(user.id, folder_id).await?;
    Ok(Json(photos))
}

//! Public portal handlers. Nothing here consults identity: the folder id
//! embedded in a share link is the entire credential.

use crate::{errors::AppError, handlers::AppState, models::photo::Photo};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};
use tokio_util::io::ReaderStream;
use uuid::Uuid;

/// GET `/portal/{folder_id}/{filename}` — stream one photo's bytes.
///
/// The target of resolved download URLs. A folder id that does not even
/// parse is treated the same as one with no such photo: not found.
pub async fn download_photo(
    State(state): State<AppState>,
    Path((folder_id, filename)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let Ok(folder_id) = Uuid::parse_str(&folder_id) else {
        return Err(AppError::not_found("no such photo"));
    };

    let (meta, file) = state.access.open_portal_photo(folder_id, &filename).await?;
    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    set_photo_headers(response.headers_mut(), &meta);

    Ok(response)
}

/// Stamp content metadata onto a photo response.
fn set_photo_headers(headers: &mut HeaderMap, meta: &Photo) {
    let content_type = meta
        .content_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".into());
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );

    let length = meta.size_bytes.max(0);
    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&length.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("0")),
    );

    let quoted = format!("\"{}\"", meta.etag);
    if let Ok(value) = HeaderValue::from_str(&quoted) {
        headers.insert(header::ETAG, value);
    }

    headers.insert(
        header::LAST_MODIFIED,
        HeaderValue::from_str(&meta.uploaded_at.to_rfc2822())
            .unwrap_or_else(|_| HeaderValue::from_static("")),
    );
}

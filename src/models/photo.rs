//! Represents an uploaded photo's metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for a single uploaded photo.
///
/// The payload bytes live on disk at
/// `<storage_dir>/folders/{folder_id}/{filename}`; this row carries
/// everything else. Re-uploading the same filename overwrites in place.
#[derive(Serialize, Clone, FromRow, Debug)]
pub struct Photo {
    /// Internal UUID for DB indexing.
    pub id: Uuid,

    /// Folder whose path prefix contains this photo.
    pub folder_id: Uuid,

    /// Filename as uploaded; unique within its folder.
    pub filename: String,

    /// MIME type supplied by the upload, if any.
    pub content_type: Option<String>,

    /// Payload size in bytes.
    pub size_bytes: i64,

    /// MD5 of the payload, computed while the upload streams to disk.
    pub etag: String,

    /// When the photo was last uploaded.
    pub uploaded_at: DateTime<Utc>,
}

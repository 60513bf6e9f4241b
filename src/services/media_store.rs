//! src/services/media_store.rs
//!
//! The media store: photo payloads on local disk, photo metadata in
//! SQLite. Payloads live beneath `base_path/folders/{folder_id}/{filename}`,
//! the same path shape that portal download URLs expose.
//!
//! Deletion is deliberately absent. Photos are never removed, only
//! overwritten by a re-upload of the same filename.

use crate::models::photo::Photo;
use bytes::Bytes;
use futures::{Stream, StreamExt, pin_mut};
use md5::Context;
use sqlx::SqlitePool;
use std::{
    io::{self, ErrorKind},
    path::PathBuf,
    sync::Arc,
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::debug;
use uuid::Uuid;

/// Longest accepted photo filename, in bytes.
const MAX_FILENAME_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("photo `{filename}` not found in folder `{folder_id}`")]
    PhotoNotFound { folder_id: Uuid, filename: String },

    #[error("invalid photo filename")]
    InvalidFilename,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type MediaResult<T> = Result<T, MediaError>;

/// Object storage for photos.
///
/// Supports exactly the operations the portal needs: put a payload,
/// enumerate everything under a folder's path prefix, resolve a photo to
/// a download URL, and open a payload for streaming out.
#[derive(Clone)]
pub struct MediaStore {
    /// Shared SQLite pool used for photo metadata.
    db: Arc<SqlitePool>,
    /// Base directory on disk where payloads are stored.
    base_path: PathBuf,
    /// Public origin resolved download URLs are built against.
    public_base_url: String,
}

impl MediaStore {
    pub fn new(
        db: Arc<SqlitePool>,
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            db,
            base_path: base_path.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Stream a photo payload into a folder.
    ///
    /// Bytes go to a temporary file first (size and MD5 etag computed
    /// in-flight), are fsync'd, then renamed into place so readers never
    /// observe a partial payload. The metadata row is upserted on the
    /// (folder, filename) pair: re-uploading a filename replaces the
    /// photo.
    pub async fn put<S>(
        &self,
        folder_id: Uuid,
        filename: &str,
        content_type: Option<String>,
        stream: S,
    ) -> MediaResult<Photo>
    where
        S: Stream<Item = io::Result<Bytes>> + Send,
    {
        ensure_filename_safe(filename)?;

        let folder_root = self.folder_root(folder_id);
        fs::create_dir_all(&folder_root).await?;
        let file_path = folder_root.join(filename);
        let tmp_path = folder_root.join(format!(".tmp-{}", Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;

        let mut size_bytes: i64 = 0;
        let mut digest = Context::new();
        pin_mut!(stream);
        while let Some(chunk_res) = stream.next().await {
            let chunk = match chunk_res {
                Ok(chunk) => chunk,
                Err(err) => {
                    let _ = fs::remove_file(&tmp_path).await;
                    return Err(MediaError::Io(err));
                }
            };
            size_bytes += chunk.len() as i64;
            digest.consume(&chunk);
            if let Err(err) = file.write_all(&chunk).await {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(MediaError::Io(err));
            }
        }
        if let Err(err) = file.flush().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(MediaError::Io(err));
        }
        if let Err(err) = file.sync_all().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(MediaError::Io(err));
        }

        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(&file_path).await?;
                fs::rename(&tmp_path, &file_path).await?;
            } else {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(MediaError::Io(err));
            }
        }

        let etag = format!("{:x}", digest.compute());
        debug!(folder = %folder_id, filename, size_bytes, %etag, "payload written");

        let insert_result = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (
                id, folder_id, filename, content_type, size_bytes, etag, uploaded_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(folder_id, filename) DO UPDATE SET
                content_type = excluded.content_type,
                size_bytes = excluded.size_bytes,
                etag = excluded.etag,
                uploaded_at = excluded.uploaded_at
            RETURNING id, folder_id, filename, content_type, size_bytes, etag, uploaded_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(folder_id)
        .bind(filename)
        .bind(content_type)
        .bind(size_bytes)
        .bind(&etag)
        .bind(chrono::Utc::now())
        .fetch_one(&*self.db)
        .await;

        match insert_result {
            Ok(photo) => Ok(photo),
            Err(err) => {
                let _ = fs::remove_file(&file_path).await;
                Err(MediaError::Sqlx(err))
            }
        }
    }

    /// Every photo stored under the folder's path prefix, in the store's
    /// enumeration order (lexicographic by filename). Unknown folder ids
    /// are simply empty prefixes.
    pub async fn list_under_prefix(&self, folder_id: Uuid) -> MediaResult<Vec<Photo>> {
        let photos = sqlx::query_as::<_, Photo>(
            "SELECT id, folder_id, filename, content_type, size_bytes, etag, uploaded_at
             FROM photos WHERE folder_id = ?
             ORDER BY filename ASC",
        )
        .bind(folder_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(photos)
    }

    /// Resolve a photo to its public download URL.
    ///
    /// Verifies the payload file is still present before constructing the
    /// URL, so resolution fails for a metadata row whose payload has gone
    /// missing. Resolved URLs carry no expiry and no credential beyond
    /// the folder id in the path.
    pub async fn resolve_download_url(&self, photo: &Photo) -> MediaResult<String> {
        let path = self.photo_path(photo.folder_id, &photo.filename);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(format!(
                "{}/portal/{}/{}",
                self.public_base_url,
                photo.folder_id,
                urlencoding::encode(&photo.filename),
            )),
            Ok(_) => Err(MediaError::PhotoNotFound {
                folder_id: photo.folder_id,
                filename: photo.filename.clone(),
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(MediaError::PhotoNotFound {
                folder_id: photo.folder_id,
                filename: photo.filename.clone(),
            }),
            Err(err) => Err(MediaError::Io(err)),
        }
    }

    /// Fetch a photo for reading.
    ///
    /// Returns metadata and an opened File handle ready for streaming out.
    /// Returns PhotoNotFound if metadata exists but the payload is missing.
    pub async fn reader(&self, folder_id: Uuid, filename: &str) -> MediaResult<(Photo, File)> {
        ensure_filename_safe(filename)?;
        let photo = self.fetch_photo(folder_id, filename).await?;

        let file_path = self.photo_path(folder_id, filename);
        let file = File::open(&file_path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                MediaError::PhotoNotFound {
                    folder_id,
                    filename: filename.to_string(),
                }
            } else {
                MediaError::Io(err)
            }
        })?;

        Ok((photo, file))
    }

    /// Fetch photo metadata from SQLite.
    async fn fetch_photo(&self, folder_id: Uuid, filename: &str) -> MediaResult<Photo> {
        sqlx::query_as::<_, Photo>(
            "SELECT id, folder_id, filename, content_type, size_bytes, etag, uploaded_at
             FROM photos WHERE folder_id = ? AND filename = ?",
        )
        .bind(folder_id)
        .bind(filename)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => MediaError::PhotoNotFound {
                folder_id,
                filename: filename.to_string(),
            },
            other => MediaError::Sqlx(other),
        })
    }

    /// Physical directory holding one folder's payloads.
    fn folder_root(&self, folder_id: Uuid) -> PathBuf {
        let mut path = self.base_path.clone();
        path.push("folders");
        path.push(folder_id.to_string());
        path
    }

    /// Fully-qualified payload path for one photo.
    fn photo_path(&self, folder_id: Uuid, filename: &str) -> PathBuf {
        let mut path = self.folder_root(folder_id);
        path.push(filename);
        path
    }
}

/// Validate a photo filename.
///
/// Filenames are single path components. Separators, traversal sequences,
/// control bytes, and hidden-file prefixes (which would collide with
/// in-flight `.tmp-*` files) are all rejected.
fn ensure_filename_safe(filename: &str) -> MediaResult<()> {
    if filename.is_empty() || filename.len() > MAX_FILENAME_LEN {
        return Err(MediaError::InvalidFilename);
    }
    if filename.contains('/') || filename.contains("..") {
        return Err(MediaError::InvalidFilename);
    }
    if filename.starts_with('.') {
        return Err(MediaError::InvalidFilename);
    }
    if filename
        .bytes()
        .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0')
    {
        return Err(MediaError::InvalidFilename);
    }
    Ok(())
}

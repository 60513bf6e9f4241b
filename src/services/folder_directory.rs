//! src/services/folder_directory.rs
//!
//! The folder directory: durable records for named photo folders, kept
//! in SQLite. Each record carries its owner and, once generated, the
//! folder's public share link.

use crate::models::folder::Folder;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Longest accepted folder display name, in bytes.
const FOLDER_NAME_MAX_LEN: usize = 120;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("folder `{0}` not found")]
    FolderNotFound(Uuid),

    #[error("folder name {0}")]
    InvalidFolderName(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Record store for folders.
///
/// All operations go through one SQLite pool, so a folder inserted here
/// is visible to the very next owner query (read-your-writes). Callers
/// must not rely on any enumeration order.
#[derive(Clone)]
pub struct FolderDirectory {
    db: Arc<SqlitePool>,
}

impl FolderDirectory {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Insert a new folder owned by `owner_id`. The id is generated here,
    /// never supplied by the caller.
    pub async fn insert(&self, owner_id: Uuid, name: &str) -> DirectoryResult<Folder> {
        ensure_name_valid(name)?;

        let folder = Folder {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
            owner_id,
            public_link: None,
        };

        sqlx::query(
            "INSERT INTO folders (id, name, created_at, owner_id, public_link)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(folder.id)
        .bind(&folder.name)
        .bind(folder.created_at)
        .bind(folder.owner_id)
        .bind(&folder.public_link)
        .execute(&*self.db)
        .await?;

        debug!(folder = %folder.id, owner = %owner_id, "folder record inserted");
        Ok(folder)
    }

    /// Every folder owned by `owner_id`.
    pub async fn query_by_owner(&self, owner_id: Uuid) -> DirectoryResult<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(
            "SELECT id, name, created_at, owner_id, public_link
             FROM folders WHERE owner_id = ?",
        )
        .bind(owner_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(folders)
    }

    /// Fetch a folder record by id.
    pub async fn get_by_id(&self, id: Uuid) -> DirectoryResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "SELECT id, name, created_at, owner_id, public_link
             FROM folders WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => DirectoryError::FolderNotFound(id),
            other => DirectoryError::Sqlx(other),
        })
    }

    /// Set the folder's public link.
    ///
    /// A partial field update, not a record replace; regenerating simply
    /// overwrites the previous value (last write wins).
    pub async fn set_public_link(&self, id: Uuid, link: &str) -> DirectoryResult<()> {
        let result = sqlx::query("UPDATE folders SET public_link = ? WHERE id = ?")
            .bind(link)
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::FolderNotFound(id));
        }
        Ok(())
    }
}

/// Validate a folder display name. Names are free-form text; only
/// emptiness, length, and control characters are rejected. Duplicate
/// names are allowed, including for the same owner.
fn ensure_name_valid(name: &str) -> DirectoryResult<()> {
    if name.trim().is_empty() {
        return Err(DirectoryError::InvalidFolderName("must not be empty"));
    }
    if name.len() > FOLDER_NAME_MAX_LEN {
        return Err(DirectoryError::InvalidFolderName(
            "exceeds the maximum length",
        ));
    }
    if name.chars().any(char::is_control) {
        return Err(DirectoryError::InvalidFolderName(
            "must not contain control characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert!(ensure_name_valid("Vacation 2024").is_ok());
        assert!(ensure_name_valid("été à Paris").is_ok());
        assert!(ensure_name_valid("x").is_ok());
    }

    #[test]
    fn rejects_empty_and_whitespace_names() {
        assert!(matches!(
            ensure_name_valid(""),
            Err(DirectoryError::InvalidFolderName(_))
        ));
        assert!(matches!(
            ensure_name_valid("   "),
            Err(DirectoryError::InvalidFolderName(_))
        ));
    }

    #[test]
    fn rejects_oversized_names() {
        let name = "a".repeat(FOLDER_NAME_MAX_LEN + 1);
        assert!(matches!(
            ensure_name_valid(&name),
            Err(DirectoryError::InvalidFolderName(_))
        ));
    }

    #[test]
    fn rejects_control_characters() {
        assert!(matches!(
            ensure_name_valid("line\nbreak"),
            Err(DirectoryError::InvalidFolderName(_))
        ));
    }
}

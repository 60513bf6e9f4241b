//! Represents a folder — an owner-scoped grouping of photos.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A named photo folder owned by exactly one user.
///
/// Folders are never deleted. The only mutation after creation is setting
/// `public_link` when the owner generates a share link.
#[derive(Serialize, Clone, FromRow, Debug)]
pub struct Folder {
    /// Store-generated folder id; embedded verbatim in share links.
    pub id: Uuid,

    /// Display name. Deliberately not unique: submitting "create" twice
    /// produces two folders with the same name.
    pub name: String,

    /// When the folder was created.
    pub created_at: DateTime<Utc>,

    /// Owning user id; the only identity allowed to manage this folder.
    pub owner_id: Uuid,

    /// Public share link (`<public_base_url>?folder=<id>`), set once the
    /// owner generates one. Permanent: there is no revocation path.
    pub public_link: Option<String>,
}

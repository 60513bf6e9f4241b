//! Represents a registered account in the identity store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user account.
///
/// Users are the owning principals for folders. The account is created by
/// registration and observed afterwards only through its opaque id.
#[derive(Serialize, Clone, FromRow, Debug)]
pub struct User {
    /// Opaque user id (UUID), referenced by folders as `owner_id`.
    pub id: Uuid,

    /// Login email, unique across the store.
    pub email: String,

    /// Argon2id PHC hash of the password. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

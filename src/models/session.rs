//! Represents an issued sign-in session.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// An opaque bearer session issued at sign-in.
///
/// Possession of the token is the credential. Sessions carry an absolute
/// expiry and are removed on sign-out; an expired or unknown token
/// authenticates as nobody.
#[derive(Clone, FromRow, Debug)]
pub struct Session {
    /// Token value presented as `Authorization: Bearer <token>`.
    pub token: Uuid,

    /// Account this session authenticates.
    pub user_id: Uuid,

    /// When the session was issued.
    pub created_at: DateTime<Utc>,

    /// Absolute expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

//! src/services/identity_service.rs
//!
//! The identity provider: email/password accounts and opaque bearer
//! sessions, both durable in SQLite. Passwords are hashed with Argon2id;
//! session tokens are UUIDv4 values with an absolute expiry.

use crate::models::{session::Session, user::User};
use argon2::{
    Argon2, Params,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use rand_core::OsRng;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// How long an issued session stays valid.
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("email `{0}` is already registered")]
    EmailTaken(String),

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("password must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters")]
    InvalidPassword,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("session expired")]
    SessionExpired,

    #[error("session not found")]
    SessionNotFound,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Accounts and sessions over a shared SQLite pool.
#[derive(Clone)]
pub struct IdentityService {
    db: Arc<SqlitePool>,
}

impl IdentityService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Create an account and sign it straight in.
    ///
    /// Email uniqueness is enforced by the store's unique index, so two
    /// racing registrations of the same address cannot both succeed.
    pub async fn register(&self, email: &str, password: &str) -> IdentityResult<(User, Session)> {
        let email = normalize_email(email);
        ensure_email_valid(&email)?;
        ensure_password_valid(password)?;
        let password_hash = hash_password(password)?;

        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: Utc::now(),
        };

        let insert = sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&*self.db)
        .await;

        match insert {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(IdentityError::EmailTaken(user.email));
            }
            Err(err) => return Err(IdentityError::Sqlx(err)),
        }

        let session = self.issue_session(user.id).await?;
        info!(user = %user.id, email = %user.email, "account registered");
        Ok((user, session))
    }

    /// Sign an existing account in with email and password.
    ///
    /// Unknown addresses and wrong passwords fail identically so the
    /// response never reveals which half was wrong.
    pub async fn login(&self, email: &str, password: &str) -> IdentityResult<(User, Session)> {
        let email = normalize_email(email);

        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(&email)
        .fetch_optional(&*self.db)
        .await?;

        let Some(user) = user else {
            warn!(email = %email, "sign-in failed: unknown email");
            return Err(IdentityError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            warn!(user = %user.id, "sign-in failed: wrong password");
            return Err(IdentityError::InvalidCredentials);
        }

        let session = self.issue_session(user.id).await?;
        info!(user = %user.id, "signed in");
        Ok((user, session))
    }

    /// End a session. Idempotent: signing out an unknown or already-ended
    /// token is a quiet no-op.
    pub async fn logout(&self, token: Uuid) -> IdentityResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&*self.db)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            debug!("session ended");
        } else {
            debug!("sign-out for unknown session");
        }
        Ok(removed)
    }

    /// Resolve a bearer token to its session and user.
    ///
    /// Expired sessions are removed on sight and authenticate as nobody.
    pub async fn authenticate(&self, token: Uuid) -> IdentityResult<(Session, User)> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => IdentityError::SessionNotFound,
            other => IdentityError::Sqlx(other),
        })?;

        if session.expires_at <= Utc::now() {
            let _ = sqlx::query("DELETE FROM sessions WHERE token = ?")
                .bind(token)
                .execute(&*self.db)
                .await;
            debug!(user = %session.user_id, "rejected expired session");
            return Err(IdentityError::SessionExpired);
        }

        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(session.user_id)
        .fetch_one(&*self.db)
        .await?;

        Ok((session, user))
    }

    /// Mint and persist a fresh session for `user_id`.
    async fn issue_session(&self, user_id: Uuid) -> IdentityResult<Session> {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4(),
            user_id,
            created_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        };

        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session.token)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&*self.db)
        .await?;

        Ok(session)
    }
}

/// Create the Argon2 hasher with recommended parameters.
///
/// Parameters:
/// - Memory cost: 64 MB (65536 KiB)
/// - Time cost: 3 iterations
/// - Parallelism: 4 threads
fn create_argon2() -> Argon2<'static> {
    let params = Params::new(65536, 3, 4, None).expect("valid Argon2 params");
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

/// Hash a password using Argon2id.
///
/// Returns a PHC-formatted hash string that includes the salt and
/// parameters.
fn hash_password(password: &str) -> IdentityResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = create_argon2()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| IdentityError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// The hash parameters come from the stored string, not from
/// `create_argon2`, so old hashes keep verifying after a parameter bump.
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Lowercase and trim an address before storing or matching it.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Structural email check. The unique index is the real gatekeeper for
/// duplicates; this only rejects strings that cannot be an address.
fn ensure_email_valid(email: &str) -> IdentityResult<()> {
    if email.is_empty() || email.len() > 254 {
        return Err(IdentityError::InvalidEmail);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(IdentityError::InvalidEmail);
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(IdentityError::InvalidEmail);
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(IdentityError::InvalidEmail);
    }
    Ok(())
}

/// Validate password length bounds.
fn ensure_password_valid(password: &str) -> IdentityResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH || password.len() > MAX_PASSWORD_LENGTH {
        return Err(IdentityError::InvalidPassword);
    }
    Ok(())
}

/// Detect SQLite unique-constraint violations.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}

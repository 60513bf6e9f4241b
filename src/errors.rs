use crate::services::{
    access_control::AccessError, folder_directory::DirectoryError,
    identity_service::IdentityError, media_store::MediaError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Failure taxonomy surfaced to clients alongside the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AuthenticationFailed,
    PermissionDenied,
    RecordNotFound,
    InvalidRequest,
    Conflict,
    StoreUnavailable,
    NetworkTimeout,
    Internal,
}

/// A lightweight wrapper for request errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status, code, and message.
    pub fn new(status: StatusCode, code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: msg.into(),
        }
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidRequest, msg)
    }

    /// Shortcut for 401 Unauthorized
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::AuthenticationFailed,
            msg,
        )
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::RecordNotFound, msg)
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Internal, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "code": self.code,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err.to_string())
    }
}

/// Metadata-store failures map to the availability half of the taxonomy.
/// Pool timeouts surface as such; anything else becomes unavailability,
/// with the detail kept in the log rather than the response.
fn from_sqlx(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::PoolTimedOut => AppError::new(
            StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::NetworkTimeout,
            "timed out waiting for the metadata store",
        ),
        other => {
            tracing::error!("metadata store failure: {}", other);
            AppError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::StoreUnavailable,
                "metadata store unavailable",
            )
        }
    }
}

fn from_io(err: std::io::Error) -> AppError {
    tracing::error!("payload store failure: {}", err);
    AppError::new(
        StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::StoreUnavailable,
        "photo storage unavailable",
    )
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::EmailTaken(_) => {
                AppError::new(StatusCode::CONFLICT, ErrorCode::Conflict, err.to_string())
            }
            IdentityError::InvalidEmail | IdentityError::InvalidPassword => {
                AppError::bad_request(err.to_string())
            }
            IdentityError::InvalidCredentials
            | IdentityError::SessionExpired
            | IdentityError::SessionNotFound => AppError::unauthorized(err.to_string()),
            IdentityError::Hash(_) => {
                tracing::error!("credential processing failure: {}", err);
                AppError::internal("could not process credentials")
            }
            IdentityError::Sqlx(e) => from_sqlx(e),
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::FolderNotFound(_) => AppError::not_found(err.to_string()),
            DirectoryError::InvalidFolderName(_) => AppError::bad_request(err.to_string()),
            DirectoryError::Sqlx(e) => from_sqlx(e),
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::PhotoNotFound { .. } => AppError::not_found(err.to_string()),
            MediaError::InvalidFilename => AppError::bad_request(err.to_string()),
            MediaError::Sqlx(e) => from_sqlx(e),
            MediaError::Io(e) => from_io(e),
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::PermissionDenied(_) => AppError::new(
                StatusCode::FORBIDDEN,
                ErrorCode::PermissionDenied,
                err.to_string(),
            ),
            AccessError::Directory(e) => e.into(),
            AccessError::Media(e) => e.into(),
        }
    }
}

//! Authentication handlers: registration, sign-in, sign-out, and the
//! current-user probe.

use crate::{
    errors::AppError,
    extract::{Requester, bearer_token},
    handlers::AppState,
    models::{session::Session, user::User},
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credentials accepted by register and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsReq {
    pub email: String,
    pub password: String,
}

/// Session payload returned whenever a sign-in happens.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: Uuid,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl SessionResponse {
    fn new(session: Session, user: User) -> Self {
        Self {
            token: session.token,
            expires_at: session.expires_at,
            user,
        }
    }
}

/// POST `/api/auth/register` — create an account and sign it in.
///
/// Registration doubles as the first sign-in, so the response carries a
/// live session token.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsReq>,
) -> Result<impl IntoResponse, AppError> {
    let (user, session) = state.identity.register(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::new(session, user))))
}

/// POST `/api/auth/login` — sign an existing account in.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsReq>,
) -> Result<impl IntoResponse, AppError> {
    let (user, session) = state.identity.login(&req.email, &req.password).await?;
    Ok(Json(SessionResponse::new(session, user)))
}

/// POST `/api/auth/logout` — end the presented session.
///
/// Always 204: signing out an unknown, expired, or absent token is a
/// quiet no-op.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    if let Some(token) = bearer_token(&headers) {
        state.identity.logout(token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/api/auth/me` — the user behind the presented session token.
pub async fn me(Requester { user }: Requester) -> Json<User> {
    Json(user)
}

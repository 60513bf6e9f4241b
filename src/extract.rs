//! Bearer-session request extractors.
//!
//! `Requester` rejects requests without a valid session; `OptionalRequester`
//! resolves one when present and carries on otherwise. Both read
//! `Authorization: Bearer <token>` and validate the token against the
//! identity service.

use crate::{
    errors::AppError, handlers::AppState, models::user::User,
    services::identity_service::IdentityError,
};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

/// The authenticated user behind a request, resolved from its bearer
/// token. Rejects with 401 when the token is missing, unknown, or
/// expired.
#[derive(Clone, Debug)]
pub struct Requester {
    pub user: User,
}

impl FromRequestParts<AppState> for Requester {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("missing bearer token"))?;
        let (_session, user) = state.identity.authenticate(token).await?;
        Ok(Requester { user })
    }
}

/// Like [`Requester`], but resolves to `None` instead of rejecting when
/// the request carries no usable session.
///
/// Only "this token names no live session" is anonymous. A store failure
/// while validating the token propagates as an error; it must never make
/// a signed-in requester look signed out.
#[derive(Clone, Debug)]
pub struct OptionalRequester(pub Option<User>);

impl FromRequestParts<AppState> for OptionalRequester {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(OptionalRequester(None));
        };
        match state.identity.authenticate(token).await {
            Ok((_session, user)) => Ok(OptionalRequester(Some(user))),
            Err(IdentityError::SessionNotFound | IdentityError::SessionExpired) => {
                Ok(OptionalRequester(None))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Pull a UUID bearer token out of the Authorization header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| Uuid::parse_str(token.trim()).ok())
}

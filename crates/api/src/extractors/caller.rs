//! Bearer token authentication extractors.
//!
//! Tokens are HS256 JWTs carrying the caller's email in the subject
//! claim; the sign-in flow that issues them lives outside this service.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::validation::normalize_email;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller identity from a bearer token.
///
/// The email is normalized (trimmed, lowercased) so handlers can use it
/// directly as a lookup key.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub email: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

fn verify_token(state: &AppState, token: &str) -> Result<CallerIdentity, ApiError> {
    let claims = shared::token::verify(&state.config.auth.token_secret, token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let email = normalize_email(&claims.sub);
    if email.is_empty() {
        return Err(ApiError::Unauthorized(
            "Token does not identify a caller".to_string(),
        ));
    }

    Ok(CallerIdentity { email })
}

#[async_trait]
impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;
        verify_token(state, token)
    }
}

/// Optional caller identity.
///
/// Lets routes serve both anonymous and authenticated callers without
/// rejecting requests that carry no (or a bad) token.
#[derive(Debug, Clone)]
pub struct OptionalCaller(pub Option<CallerIdentity>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Some(token) => Ok(OptionalCaller(verify_token(state, token).ok())),
            None => Ok(OptionalCaller(None)),
        }
    }
}

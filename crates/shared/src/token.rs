//! Bearer token issuing and verification.
//!
//! The sign-in flow (OAuth against Google/Microsoft) lives outside this
//! service; once a user has authenticated, the front end holds an HS256
//! token whose subject is the user's email address. This module is the
//! only place tokens are encoded or decoded.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token encoding failed: {0}")]
    Encode(String),

    #[error("Token is invalid or expired")]
    Invalid,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's email address.
    pub sub: String,
    /// Expiration as a Unix timestamp.
    pub exp: i64,
}

/// Issue a token for the given email, valid for `ttl_secs` seconds.
pub fn issue(secret: &str, email: &str, ttl_secs: i64) -> Result<String, TokenError> {
    let claims = Claims {
        sub: email.to_string(),
        exp: Utc::now().timestamp() + ttl_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encode(e.to_string()))
}

/// Verify a token and return its claims.
///
/// Rejects tokens with a bad signature or a past expiration.
pub fn verify(secret: &str, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)
}

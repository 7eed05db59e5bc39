//! Authenticated caller extractor

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::middleware::{AuthError, AuthUser};

/// The authenticated caller
///
/// Only resolves behind `require_auth`; elsewhere it rejects with
/// `AUTH_REQUIRED`.
#[derive(Debug, Clone, Copy)]
pub struct Auth(pub AuthUser);

impl Auth {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .map(Auth)
            .ok_or_else(AuthError::required)
    }
}

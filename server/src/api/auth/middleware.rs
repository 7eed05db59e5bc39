//! Authentication middleware

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::jwt::JwtError;
use super::manager::AuthManager;
use crate::api::types::ErrorBody;

/// Authentication error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    pub fn required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "AUTH_REQUIRED",
            message: "Authentication required".to_string(),
        }
    }

    pub fn expired() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "TOKEN_EXPIRED",
            message: "Access token has expired".to_string(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "TOKEN_INVALID",
            message: "Invalid access token".to_string(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "INVALID_CREDENTIALS",
            message: "Invalid email or password".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: "unauthorized".to_string(),
            code: self.code.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Identity of the caller, injected into request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Require a valid Bearer access token
///
/// Injects `AuthUser` into request extensions.
pub async fn require_auth(
    State(auth): State<Arc<AuthManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(&request).ok_or_else(AuthError::required)?;

    let claims = auth.validate(token).map_err(|e| match e {
        JwtError::Expired => AuthError::expired(),
        e => {
            tracing::debug!(error = %e, "Rejected access token");
            AuthError::invalid()
        }
    })?;
    let user_id = claims.user_id().ok_or_else(AuthError::invalid)?;

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}

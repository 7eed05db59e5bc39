//! Authentication API endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::auth::{AuthError, AuthManager};
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::domain::UserService;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Always `Bearer`
    pub token_type: &'static str,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthRoutesState {
    pub auth_manager: Arc<AuthManager>,
    pub users: UserService,
}

/// Create auth routes
pub fn routes(auth_manager: Arc<AuthManager>, users: UserService) -> Router {
    Router::new()
        .route("/login", post(login))
        .with_state(AuthRoutesState {
            auth_manager,
            users,
        })
}

/// Exchange email and password for an access token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = crate::api::types::ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AuthRoutesState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user_id = state
        .users
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or_else(AuthError::invalid_credentials)?;

    let issued = state.auth_manager.issue(user_id).map_err(|e| {
        tracing::error!(error = %e, "Failed to issue access token");
        ApiError::internal("Failed to issue access token")
    })?;

    tracing::debug!(user_id, "User logged in");
    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_in: issued.expires_in,
    }))
}

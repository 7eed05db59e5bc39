//! User API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::domain::UserService;

use types::{CreateUserRequest, UpdateUserRequest, UserDto};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub users: UserService,
}

/// Registration route (no authentication)
pub fn public_routes(users: UserService) -> Router<()> {
    Router::new()
        .route("/", post(create_user))
        .with_state(UsersApiState { users })
}

/// Routes acting on the authenticated user
pub fn routes(users: UserService) -> Router<()> {
    Router::new()
        .route(
            "/me",
            get(get_current_user)
                .put(update_current_user)
                .delete(delete_current_user),
        )
        .with_state(UsersApiState { users })
}

async fn load_user(users: &UserService, user_id: i64) -> Result<UserDto, ApiError> {
    users
        .get(user_id)
        .await?
        .map(UserDto::from)
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", "User not found"))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Invalid request", body = crate::api::types::ErrorBody),
        (status = 409, description = "Email already registered", body = crate::api::types::ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<UsersApiState>,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let user_id = state
        .users
        .insert(&body.name, &body.email, &body.password)
        .await?;
    let user = load_user(&state.users, user_id).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User profile", body = UserDto),
        (status = 401, description = "Not authenticated", body = crate::api::types::ErrorBody),
        (status = 404, description = "User not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_current_user(
    State(state): State<UsersApiState>,
    auth: Auth,
) -> Result<Json<UserDto>, ApiError> {
    Ok(Json(load_user(&state.users, auth.user_id()).await?))
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    tag = "users",
    security(("bearer" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User profile updated", body = UserDto),
        (status = 400, description = "Nothing to update", body = crate::api::types::ErrorBody),
        (status = 404, description = "User not found", body = crate::api::types::ErrorBody),
        (status = 409, description = "Email already registered", body = crate::api::types::ErrorBody)
    )
)]
pub async fn update_current_user(
    State(state): State<UsersApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let updated = state
        .users
        .update(
            auth.user_id(),
            body.name.as_deref(),
            body.email.as_deref(),
            body.password.as_deref(),
        )
        .await?;
    if updated == 0 {
        return Err(ApiError::not_found("USER_NOT_FOUND", "User not found"));
    }
    Ok(Json(load_user(&state.users, auth.user_id()).await?))
}

/// Delete the current user and all of their todos
#[utoipa::path(
    delete,
    path = "/api/v1/users/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn delete_current_user(
    State(state): State<UsersApiState>,
    auth: Auth,
) -> Result<StatusCode, ApiError> {
    match state.users.delete(auth.user_id()).await? {
        0 => Err(ApiError::not_found("USER_NOT_FOUND", "User not found")),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}

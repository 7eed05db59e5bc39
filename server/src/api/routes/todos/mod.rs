//! Todo API endpoints
//!
//! Every route acts on the authenticated user's own todos.

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::{TodoPath, ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::domain::{NewTodo, TodoService};

use types::{
    BatchCreateTodosRequest, BatchCreatedResponse, CreateTodoRequest, ListTodosQuery, TodoDto,
    UpdateTodoRequest,
};

/// Shared state for Todos API endpoints
#[derive(Clone)]
pub struct TodosApiState {
    pub todos: TodoService,
}

/// Build Todos API routes
pub fn routes(todos: TodoService) -> Router<()> {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/batch", post(create_todos_batch))
        .route(
            "/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/{id}/complete", put(toggle_todo))
        .with_state(TodosApiState { todos })
}

fn todo_not_found(id: i64) -> ApiError {
    ApiError::not_found("TODO_NOT_FOUND", format!("Todo {} not found", id))
}

async fn load_todo(todos: &TodoService, user_id: i64, id: i64) -> Result<TodoDto, ApiError> {
    todos
        .get(user_id, id)
        .await?
        .map(TodoDto::from)
        .ok_or_else(|| todo_not_found(id))
}

/// List the current user's todos
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    tag = "todos",
    security(("bearer" = [])),
    params(ListTodosQuery),
    responses(
        (status = 200, description = "Matching todos", body = Vec<TodoDto>),
        (status = 401, description = "Not authenticated", body = crate::api::types::ErrorBody)
    )
)]
pub async fn list_todos(
    State(state): State<TodosApiState>,
    auth: Auth,
    ValidatedQuery(query): ValidatedQuery<ListTodosQuery>,
) -> Result<Json<Vec<TodoDto>>, ApiError> {
    let rows = state
        .todos
        .list(auth.user_id(), query.completed, query.q.as_deref())
        .await?;
    Ok(Json(rows.into_iter().map(TodoDto::from).collect()))
}

/// Create a todo
#[utoipa::path(
    post,
    path = "/api/v1/todos",
    tag = "todos",
    security(("bearer" = [])),
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoDto),
        (status = 400, description = "Invalid request", body = crate::api::types::ErrorBody)
    )
)]
pub async fn create_todo(
    State(state): State<TodosApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoDto>), ApiError> {
    let id = state.todos.insert(auth.user_id(), body.into()).await?;
    let todo = load_todo(&state.todos, auth.user_id(), id).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Create several todos in one statement
#[utoipa::path(
    post,
    path = "/api/v1/todos/batch",
    tag = "todos",
    security(("bearer" = [])),
    request_body = BatchCreateTodosRequest,
    responses(
        (status = 201, description = "Todos created", body = BatchCreatedResponse),
        (status = 400, description = "Invalid request", body = crate::api::types::ErrorBody)
    )
)]
pub async fn create_todos_batch(
    State(state): State<TodosApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<BatchCreateTodosRequest>,
) -> Result<(StatusCode, Json<BatchCreatedResponse>), ApiError> {
    let count = body.todos.len();
    let todos: Vec<NewTodo> = body.todos.into_iter().map(NewTodo::from).collect();
    let last_id = state.todos.insert_many(auth.user_id(), todos).await?;
    Ok((
        StatusCode::CREATED,
        Json(BatchCreatedResponse { count, last_id }),
    ))
}

/// Get one todo
#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    tag = "todos",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = TodoDto),
        (status = 404, description = "Todo not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_todo(
    State(state): State<TodosApiState>,
    auth: Auth,
    path: TodoPath,
) -> Result<Json<TodoDto>, ApiError> {
    Ok(Json(load_todo(&state.todos, auth.user_id(), path.id).await?))
}

/// Update title and/or description
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    tag = "todos",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoDto),
        (status = 400, description = "Nothing to update", body = crate::api::types::ErrorBody),
        (status = 404, description = "Todo not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn update_todo(
    State(state): State<TodosApiState>,
    auth: Auth,
    path: TodoPath,
    ValidatedJson(body): ValidatedJson<UpdateTodoRequest>,
) -> Result<Json<TodoDto>, ApiError> {
    let updated = state
        .todos
        .update(
            auth.user_id(),
            path.id,
            body.title.as_deref(),
            body.description.as_deref(),
        )
        .await?;
    if updated == 0 {
        return Err(todo_not_found(path.id));
    }
    Ok(Json(load_todo(&state.todos, auth.user_id(), path.id).await?))
}

/// Flip the completion flag
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}/complete",
    tag = "todos",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo with its new completion state", body = TodoDto),
        (status = 404, description = "Todo not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn toggle_todo(
    State(state): State<TodosApiState>,
    auth: Auth,
    path: TodoPath,
) -> Result<Json<TodoDto>, ApiError> {
    state.todos.toggle_completion(auth.user_id(), path.id).await?;
    Ok(Json(load_todo(&state.todos, auth.user_id(), path.id).await?))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    tag = "todos",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "Todo not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn delete_todo(
    State(state): State<TodosApiState>,
    auth: Auth,
    path: TodoPath,
) -> Result<StatusCode, ApiError> {
    match state.todos.delete(auth.user_id(), path.id).await? {
        0 => Err(todo_not_found(path.id)),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}

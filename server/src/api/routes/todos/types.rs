//! Todo API types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{NewTodo, TodoRow};

/// Todo DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoDto {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub user_id: i64,
    /// RFC 3339 UTC
    pub created_at: String,
    /// RFC 3339 UTC
    pub updated_at: String,
}

impl From<TodoRow> for TodoDto {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Query parameters for listing todos
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTodosQuery {
    /// Only todos with this completion state
    pub completed: Option<bool>,
    /// Substring match on title or description
    #[validate(length(max = 200, message = "Search text must be at most 200 characters"))]
    pub q: Option<String>,
}

/// Request body for creating a todo
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

impl From<CreateTodoRequest> for NewTodo {
    fn from(request: CreateTodoRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
        }
    }
}

/// Request body for creating several todos at once (at most `MAX_BATCH_TODOS`)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BatchCreateTodosRequest {
    #[validate(length(min = 1, max = 500, message = "Batch must hold 1-500 todos"), nested)]
    pub todos: Vec<CreateTodoRequest>,
}

/// Response for a batch insert
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchCreatedResponse {
    pub count: usize,
    /// Id of the last todo written
    pub last_id: i64,
}

/// Request body for updating a todo. Omitted fields are unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

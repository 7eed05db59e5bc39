//! Shared API types
//!
//! Error responses and the mapping from service errors to HTTP statuses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use super::auth::AuthError;
use crate::data::error::DataError;
use crate::data::query::QueryError;
use crate::domain::ServiceError;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Error class (`bad_request`, `not_found`, ...)
    pub error: String,
    /// Stable machine-readable code
    pub code: String,
    pub message: String,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Unauthorized { code: String, message: String },
    Conflict { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Map a storage failure. Details of unexpected failures are logged, not returned.
    pub fn from_data(e: DataError) -> Self {
        match e {
            DataError::Conflict(_) => Self::conflict(
                "CONFLICT",
                "The request conflicts with existing data",
            ),
            DataError::NotFound(message) => Self::not_found("NOT_FOUND", message),
            DataError::Unavailable { .. } => {
                tracing::error!(error = %e, "Storage unavailable");
                Self::service_unavailable("Database is not available")
            }
            other => {
                tracing::error!(error = %other, "Data error");
                Self::internal("Database operation failed")
            }
        }
    }

    pub fn from_query(e: QueryError) -> Self {
        match e {
            QueryError::InvalidExpression(_)
            | QueryError::MissingFilter { .. }
            | QueryError::MissingUpdateData { .. } => Self::bad_request(e.code(), e.to_string()),
            QueryError::InsertFailed { .. } => {
                tracing::error!(error = %e, "Insert failed");
                Self::internal("Database operation failed")
            }
            QueryError::Storage(e) => Self::from_data(e),
        }
    }

    pub fn from_service(e: ServiceError) -> Self {
        match e {
            ServiceError::Query(e) => Self::from_query(e),
            ServiceError::NotFound { entity, id } => Self::not_found(
                "NOT_FOUND",
                format!("{} {} not found", entity, id),
            ),
            other => {
                tracing::error!(error = %other, "Service error");
                Self::internal("Internal server error")
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self::from_service(e)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::unauthorized(e.code, e.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", code, message)
            }
            Self::Conflict { code, message } => (StatusCode::CONFLICT, "conflict", code, message),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(ErrorBody {
                error: error_type.to_string(),
                code,
                message,
            }),
        )
            .into_response()
    }
}

//! Storage error classification
//!
//! Raw driver errors are sorted into the few classes callers act on:
//! constraint conflicts, missing rows, an unavailable pool, and everything
//! else passed through untouched.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// SQLite result code for "unknown opcode / not found"
const SQLITE_NOTFOUND: &str = "12";

/// Error type for storage operations
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error not covered by another class
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// Constraint violation: unique, foreign key, not-null or check
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage reported a missing row or object
    #[error("Not found: {0}")]
    NotFound(String),

    /// Connection missing or pool closed
    #[error("Backend {backend} is not available: {reason}")]
    Unavailable {
        backend: &'static str,
        reason: String,
    },

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Classify a SQLite driver error
    pub fn from_sqlite(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => Self::NotFound("row not found".to_string()),
            sqlx::Error::PoolClosed => Self::unavailable("sqlite", "connection pool is closed"),
            sqlx::Error::Database(db) => {
                if matches!(
                    db.kind(),
                    ErrorKind::UniqueViolation
                        | ErrorKind::ForeignKeyViolation
                        | ErrorKind::NotNullViolation
                        | ErrorKind::CheckViolation
                ) {
                    Self::Conflict(db.message().to_string())
                } else if db.code().as_deref() == Some(SQLITE_NOTFOUND) {
                    Self::NotFound(db.message().to_string())
                } else {
                    Self::Sqlite(e)
                }
            }
            _ => Self::Sqlite(e),
        }
    }

    /// Create a migration failed error
    pub fn migration_failed(backend: &'static str, version: i32, name: &str, error: &str) -> Self {
        Self::MigrationFailed {
            backend,
            version,
            name: name.to_string(),
            error: error.to_string(),
        }
    }

    /// Create a backend unavailable error
    pub fn unavailable(backend: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            backend,
            reason: reason.into(),
        }
    }

    /// Stable code for API responses and logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "CONSTRAINT_VIOLATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unavailable { .. } => "UNAVAILABLE",
            _ => "UNKNOWN",
        }
    }
}

impl From<sqlx::Error> for DataError {
    fn from(e: sqlx::Error) -> Self {
        Self::from_sqlite(e)
    }
}

impl From<crate::data::sqlite::SqliteError> for DataError {
    fn from(e: crate::data::sqlite::SqliteError) -> Self {
        match e {
            crate::data::sqlite::SqliteError::Database(e) => Self::from_sqlite(e),
            crate::data::sqlite::SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::migration_failed("sqlite", version, &name, &error),
            crate::data::sqlite::SqliteError::Io(e) => Self::Io(e),
        }
    }
}

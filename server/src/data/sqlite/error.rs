//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_error_display() {
        let err = SqliteError::MigrationFailed {
            version: 1,
            name: "create_todos".to_string(),
            error: "table todos already exists".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 1 (create_todos) failed: table todos already exists"
        );
    }

    #[test]
    fn test_migration_failure_keeps_backend_in_data_error() {
        let err = SqliteError::MigrationFailed {
            version: 1,
            name: "create_todos".to_string(),
            error: "boom".to_string(),
        };
        let data_err: crate::data::DataError = err.into();
        assert!(matches!(
            data_err,
            crate::data::DataError::MigrationFailed {
                backend: "sqlite",
                version: 1,
                ..
            }
        ));
    }
}

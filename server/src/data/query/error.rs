//! Query executor error taxonomy

use thiserror::Error;

use crate::data::error::DataError;
use crate::data::filter::FilterError;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    InvalidExpression(#[from] FilterError),

    /// Write attempted with an empty filter
    #[error("Refusing to {operation} {table} without conditions")]
    MissingFilter {
        operation: &'static str,
        table: String,
    },

    #[error("No data provided to update {table}")]
    MissingUpdateData { table: String },

    /// Storage reported no row id after an insert
    #[error("Insert into {table} produced no row id")]
    InsertFailed { table: String },

    #[error("Storage failure: {0}")]
    Storage(#[from] DataError),
}

impl QueryError {
    pub(crate) fn missing_filter(operation: &'static str, table: &str) -> Self {
        Self::MissingFilter {
            operation,
            table: table.to_string(),
        }
    }

    /// Stable machine-readable kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidExpression(_) => "INVALID_EXPRESSION",
            Self::MissingFilter { .. } => "MISSING_FILTER",
            Self::MissingUpdateData { .. } => "MISSING_UPDATE_DATA",
            Self::InsertFailed { .. } => "INSERT_FAILED",
            Self::Storage(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            QueryError::missing_filter("delete from", "todos").to_string(),
            "Refusing to delete from todos without conditions"
        );
        assert_eq!(
            QueryError::MissingUpdateData {
                table: "todos".into()
            }
            .to_string(),
            "No data provided to update todos"
        );
    }

    #[test]
    fn test_codes() {
        let invalid: QueryError = FilterError::invalid("bad").into();
        assert_eq!(invalid.code(), "INVALID_EXPRESSION");
        let storage: QueryError = DataError::Conflict("dup".into()).into();
        assert_eq!(storage.code(), "CONSTRAINT_VIOLATION");
    }
}

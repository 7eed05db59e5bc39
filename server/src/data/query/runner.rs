//! Storage collaborator seam

use async_trait::async_trait;

use super::statement::Statement;
use crate::data::error::DataError;
use crate::data::sql::Backend;
use crate::data::value::Record;

/// Outcome of a write statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Row id of the last inserted row, when the statement inserted one
    pub last_insert_id: Option<i64>,
    pub rows_affected: u64,
}

/// Executes assembled statements against a database
///
/// Implementations bind `statement.values` positionally and map driver
/// errors through [`DataError`].
#[async_trait]
pub trait StatementRunner: Send + Sync {
    /// Backend whose dialect statements must be rendered in
    fn backend(&self) -> Backend;

    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Record>, DataError>;

    async fn execute(&self, statement: &Statement) -> Result<ExecOutcome, DataError>;
}

//! Query executor facade
//!
//! Assembles one statement per call, hands it to the runner and shapes the
//! result. No state is kept between calls.

use tracing::Level;

use super::error::QueryError;
use super::runner::StatementRunner;
use super::statement::{self, Statement};
use crate::data::filter::Filter;
use crate::data::sql::SqlDialect;
use crate::data::value::Record;
use crate::utils::sql::simulate_sql_query;

#[derive(Debug, Clone)]
pub struct QueryExecutor<R> {
    runner: R,
}

impl<R: StatementRunner> QueryExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn dialect(&self) -> &'static dyn SqlDialect {
        self.runner.backend().dialect()
    }

    fn log(&self, operation: &'static str, statement: &Statement) {
        if tracing::enabled!(Level::DEBUG) {
            tracing::debug!(
                operation,
                backend = %self.runner.backend(),
                sql = %simulate_sql_query(&statement.text, &statement.values),
                "Executing statement"
            );
        }
    }

    /// All columns of the matching rows; `None` matches every row
    pub async fn select_all(
        &self,
        table: &str,
        filter: Option<&Filter>,
    ) -> Result<Vec<Record>, QueryError> {
        self.select_columns(table, &[], filter).await
    }

    /// Projected columns of the matching rows
    pub async fn select_columns(
        &self,
        table: &str,
        columns: &[&str],
        filter: Option<&Filter>,
    ) -> Result<Vec<Record>, QueryError> {
        let stmt = statement::select(self.dialect(), table, columns, filter);
        self.log("select", &stmt);
        Ok(self.runner.fetch_all(&stmt).await?)
    }

    /// Insert one row and return its id
    pub async fn insert(&self, table: &str, data: &Record) -> Result<i64, QueryError> {
        let stmt = statement::insert(self.dialect(), table, data);
        self.log("insert", &stmt);
        let outcome = self.runner.execute(&stmt).await?;
        outcome
            .last_insert_id
            .ok_or_else(|| QueryError::InsertFailed {
                table: table.to_string(),
            })
    }

    /// Insert many rows in one statement and return the last row id
    ///
    /// An empty batch is a successful no-op returning 0.
    pub async fn bulk_insert(&self, table: &str, rows: &[Record]) -> Result<i64, QueryError> {
        let Some(stmt) = statement::bulk_insert(self.dialect(), table, rows) else {
            return Ok(0);
        };
        self.log("bulk_insert", &stmt);
        let outcome = self.runner.execute(&stmt).await?;
        outcome
            .last_insert_id
            .ok_or_else(|| QueryError::InsertFailed {
                table: table.to_string(),
            })
    }

    /// Update matching rows and return the affected count
    pub async fn update(
        &self,
        table: &str,
        data: &Record,
        filter: &Filter,
    ) -> Result<u64, QueryError> {
        let stmt = statement::update(self.dialect(), table, data, filter)?;
        self.log("update", &stmt);
        Ok(self.runner.execute(&stmt).await?.rows_affected)
    }

    /// Delete matching rows and return the affected count
    pub async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, QueryError> {
        let stmt = statement::delete(self.dialect(), table, filter)?;
        self.log("delete", &stmt);
        Ok(self.runner.execute(&stmt).await?.rows_affected)
    }
}

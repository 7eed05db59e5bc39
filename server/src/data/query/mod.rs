//! Query execution
//!
//! - `statement` - SELECT/INSERT/UPDATE/DELETE assembly around compiled filters
//! - `runner` - the storage seam statements are handed to
//! - `executor` - the facade domain services call

mod error;
mod executor;
mod runner;
mod statement;

pub use error::QueryError;
pub use executor::QueryExecutor;
pub use runner::{ExecOutcome, StatementRunner};
pub use statement::Statement;
pub use statement::{bulk_insert, delete, insert, select, update};

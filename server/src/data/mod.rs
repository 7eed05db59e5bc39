//! Data storage layer
//!
//! - `value` - Scalars and ordered records shared by every layer below
//! - `filter` - Filter expression trees and their compiler
//! - `sql` - Placeholder rendering per backend
//! - `query` - Statement assembly and the query executor facade
//! - `sqlite` - SQLite pool, schema and statement runner
//! - `error` - Storage failure classification

pub mod error;
pub mod filter;
pub mod query;
pub mod sql;
pub mod sqlite;
pub mod value;

pub use error::DataError;
pub use sqlite::SqliteService;

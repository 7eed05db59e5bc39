//! Domain services
//!
//! - `todos` - Per-user todo lists
//! - `users` - Accounts and credential checks

pub mod error;
pub mod todos;
pub mod users;

pub use error::ServiceError;
pub use todos::{NewTodo, TodoRow, TodoService};
pub use users::{UserRow, UserService};

use chrono::SecondsFormat;

/// Current time as an RFC 3339 UTC string
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

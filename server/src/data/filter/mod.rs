//! Filter expressions
//!
//! Callers build a tree of conditions and AND/OR groups with
//! [`FilterBuilder`], and the compiler lowers it into a parameterized
//! condition fragment for a WHERE clause.
//!
//! ## Usage
//!
//! ```no_run
//! use kotodo_server::data::filter::{ComparisonOp, FilterBuilder};
//!
//! let filter = FilterBuilder::new()
//!     .add_condition("user_id", 7, ComparisonOp::Eq)
//!     .build()
//!     .unwrap();
//! let fragment = filter.compile();
//! assert_eq!(fragment.text, "user_id = ?");
//! ```

mod builder;
mod compiler;
mod types;

pub use builder::{Filter, FilterBuilder};
pub use compiler::{compile, compile_with};
pub use types::{
    CompiledFragment, ComparisonOp, Condition, FilterError, FilterNode, Group, LogicalOp,
};

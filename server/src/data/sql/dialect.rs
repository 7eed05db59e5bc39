//! SQL dialect trait
//!
//! Statement text is dialect-neutral apart from the placeholder token, so
//! that is all a dialect renders.

/// SQL dialect trait for rendering bound-parameter placeholders
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - SQLite: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Comma-separated placeholders for `count` values, the first bound at
    /// `start` (1-based)
    fn placeholder_list(&self, start: usize, count: usize) -> String {
        (start..start + count)
            .map(|index| self.placeholder(index))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

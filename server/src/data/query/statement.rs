//! Statement assembly
//!
//! Pure functions from (table, filter, data) to statement text and values.
//! Placeholder numbering runs across the whole statement, so a WHERE clause
//! after a SET clause continues where the assignments stopped.

use super::error::QueryError;
use crate::data::filter::{CompiledFragment, Filter, LogicalOp, compile_with};
use crate::data::sql::SqlDialect;
use crate::data::value::{Record, Scalar};

/// Parameterized statement ready for execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub text: String,
    pub values: Vec<Scalar>,
}

fn where_fragment(dialect: &dyn SqlDialect, filter: &Filter, bound_before: usize) -> CompiledFragment {
    compile_with(dialect, filter.nodes(), LogicalOp::And, bound_before)
}

/// `SELECT <columns> FROM <table> [WHERE ...]`; no columns means `*`
pub fn select(
    dialect: &dyn SqlDialect,
    table: &str,
    columns: &[&str],
    filter: Option<&Filter>,
) -> Statement {
    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    };
    let mut text = format!("SELECT {} FROM {}", projection, table);

    let fragment = filter
        .map(|f| where_fragment(dialect, f, 0))
        .unwrap_or_default();
    if !fragment.is_empty() {
        text.push_str(" WHERE ");
        text.push_str(&fragment.text);
    }

    Statement {
        text,
        values: fragment.values,
    }
}

/// `INSERT INTO <table> (<fields>) VALUES (<placeholders>)`
pub fn insert(dialect: &dyn SqlDialect, table: &str, data: &Record) -> Statement {
    if data.is_empty() {
        return Statement {
            text: format!("INSERT INTO {} DEFAULT VALUES", table),
            values: Vec::new(),
        };
    }

    let fields: Vec<&str> = data.field_names().collect();
    Statement {
        text: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            fields.join(", "),
            dialect.placeholder_list(1, data.len())
        ),
        values: data.values().cloned().collect(),
    }
}

/// Multi-row insert; `None` for an empty batch
///
/// Column names come from the first row. Each tuple is sized to its own row
/// so text and values stay aligned even for mismatched rows, which the
/// storage then rejects.
pub fn bulk_insert(dialect: &dyn SqlDialect, table: &str, rows: &[Record]) -> Option<Statement> {
    let first = rows.first()?;
    let fields: Vec<&str> = first.field_names().collect();

    let mut values = Vec::with_capacity(rows.len() * first.len());
    let mut tuples = Vec::with_capacity(rows.len());
    for row in rows {
        tuples.push(format!(
            "({})",
            dialect.placeholder_list(values.len() + 1, row.len())
        ));
        values.extend(row.values().cloned());
    }

    Some(Statement {
        text: format!(
            "INSERT INTO {} ({}) VALUES {}",
            table,
            fields.join(", "),
            tuples.join(", ")
        ),
        values,
    })
}

/// `UPDATE <table> SET ... WHERE ...`; values are assignments then filter
pub fn update(
    dialect: &dyn SqlDialect,
    table: &str,
    data: &Record,
    filter: &Filter,
) -> Result<Statement, QueryError> {
    if data.is_empty() {
        return Err(QueryError::MissingUpdateData {
            table: table.to_string(),
        });
    }

    let fragment = where_fragment(dialect, filter, data.len());
    if fragment.is_empty() {
        return Err(QueryError::missing_filter("update", table));
    }

    let assignments: Vec<String> = data
        .field_names()
        .enumerate()
        .map(|(i, field)| format!("{} = {}", field, dialect.placeholder(i + 1)))
        .collect();

    let mut values: Vec<Scalar> = data.values().cloned().collect();
    values.extend(fragment.values);

    Ok(Statement {
        text: format!(
            "UPDATE {} SET {} WHERE {}",
            table,
            assignments.join(", "),
            fragment.text
        ),
        values,
    })
}

/// `DELETE FROM <table> WHERE ...`
pub fn delete(dialect: &dyn SqlDialect, table: &str, filter: &Filter) -> Result<Statement, QueryError> {
    let fragment = where_fragment(dialect, filter, 0);
    if fragment.is_empty() {
        return Err(QueryError::missing_filter("delete from", table));
    }

    Ok(Statement {
        text: format!("DELETE FROM {} WHERE {}", table, fragment.text),
        values: fragment.values,
    })
}

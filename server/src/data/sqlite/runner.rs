//! SQLite statement runner
//!
//! Binds `Scalar` values positionally and decodes rows by storage class,
//! so results come back without a per-table row type.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite, SqlitePool, TypeInfo, ValueRef};

use crate::data::error::DataError;
use crate::data::query::{ExecOutcome, Statement, StatementRunner};
use crate::data::sql::Backend;
use crate::data::value::{Record, Scalar};

/// Runs statements on a SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteRunner {
    pool: SqlitePool,
}

impl SqliteRunner {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn bind_all(statement: &Statement) -> sqlx::query::Query<'_, Sqlite, SqliteArguments<'_>> {
    let mut query = sqlx::query(&statement.text);
    for value in &statement.values {
        query = match value {
            Scalar::Null => query.bind(None::<i64>),
            Scalar::Bool(v) => query.bind(*v),
            Scalar::Integer(v) => query.bind(*v),
            Scalar::Float(v) => query.bind(*v),
            Scalar::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

fn decode_row(row: &SqliteRow) -> Result<Record, DataError> {
    let mut record = Record::new();
    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;

        let value = if raw.is_null() {
            Scalar::Null
        } else {
            let storage_class = raw.type_info().name().to_ascii_uppercase();
            match storage_class.as_str() {
                "INTEGER" | "INT" | "INT8" | "BIGINT" | "BOOLEAN" => {
                    Scalar::Integer(row.try_get_unchecked::<i64, _>(index)?)
                }
                "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
                    Scalar::Float(row.try_get_unchecked::<f64, _>(index)?)
                }
                "BLOB" => Scalar::Text(hex::encode(row.try_get_unchecked::<Vec<u8>, _>(index)?)),
                _ => Scalar::Text(row.try_get_unchecked::<String, _>(index)?),
            }
        };
        record.set(column.name(), value);
    }
    Ok(record)
}

#[async_trait]
impl StatementRunner for SqliteRunner {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Record>, DataError> {
        let rows = bind_all(statement).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, statement: &Statement) -> Result<ExecOutcome, DataError> {
        let result = bind_all(statement).execute(&self.pool).await?;
        let rows_affected = result.rows_affected();
        Ok(ExecOutcome {
            last_insert_id: (rows_affected > 0).then(|| result.last_insert_rowid()),
            rows_affected,
        })
    }
}

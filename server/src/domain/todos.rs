//! Todo service
//!
//! Every operation is scoped to the owning user: a todo that belongs to
//! someone else behaves exactly like a missing one.

use serde::Serialize;

use super::error::ServiceError;
use super::now_timestamp;
use crate::data::filter::{ComparisonOp, Filter, FilterBuilder, LogicalOp};
use crate::data::query::QueryExecutor;
use crate::data::sqlite::SqliteRunner;
use crate::data::value::{DecodeError, Record};
use crate::utils::sql::escape_like_pattern;

pub const TODOS_TABLE: &str = "todos";

/// A stored todo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<&Record> for TodoRow {
    type Error = DecodeError;

    fn try_from(row: &Record) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.require_i64("id")?,
            title: row.require_str("title")?,
            description: row.optional_str("description")?,
            completed: row.require_bool("completed")?,
            user_id: row.require_i64("user_id")?,
            created_at: row.require_str("created_at")?,
            updated_at: row.require_str("updated_at")?,
        })
    }
}

/// Payload for a new todo
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

impl NewTodo {
    fn into_record(self, user_id: i64, now: &str) -> Record {
        Record::new()
            .with("title", self.title)
            .with("description", self.description)
            .with("completed", false)
            .with("user_id", user_id)
            .with("created_at", now)
            .with("updated_at", now)
    }
}

#[derive(Debug, Clone)]
pub struct TodoService {
    executor: QueryExecutor<SqliteRunner>,
}

impl TodoService {
    pub fn new(runner: SqliteRunner) -> Self {
        Self {
            executor: QueryExecutor::new(runner),
        }
    }

    fn owned(user_id: i64, todo_id: i64) -> Result<Filter, ServiceError> {
        Ok(FilterBuilder::new()
            .eq("id", todo_id)
            .eq("user_id", user_id)
            .build()?)
    }

    async fn fetch(&self, filter: &Filter) -> Result<Vec<TodoRow>, ServiceError> {
        let rows = self.executor.select_all(TODOS_TABLE, Some(filter)).await?;
        Ok(rows
            .iter()
            .map(TodoRow::try_from)
            .collect::<Result<_, _>>()?)
    }

    /// Todos of a user, optionally narrowed by status and a text search
    ///
    /// The search matches title or description as a literal substring:
    /// `%` and `_` in it match only themselves.
    pub async fn list(
        &self,
        user_id: i64,
        completed: Option<bool>,
        search: Option<&str>,
    ) -> Result<Vec<TodoRow>, ServiceError> {
        let mut builder = FilterBuilder::new().eq("user_id", user_id);
        if let Some(completed) = completed {
            builder = builder.eq("completed", completed);
        }
        if let Some(query) = search.map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", escape_like_pattern(query));
            let text = FilterBuilder::new()
                .add_condition("title", pattern.clone(), ComparisonOp::Like)
                .add_condition("description", pattern, ComparisonOp::Like);
            builder = builder.add_nested(LogicalOp::Or, text);
        }
        self.fetch(&builder.build()?).await
    }

    pub async fn retrieve_by_status(
        &self,
        user_id: i64,
        completed: bool,
    ) -> Result<Vec<TodoRow>, ServiceError> {
        self.list(user_id, Some(completed), None).await
    }

    pub async fn get_all(&self, user_id: i64) -> Result<Vec<TodoRow>, ServiceError> {
        self.list(user_id, None, None).await
    }

    pub async fn get(&self, user_id: i64, todo_id: i64) -> Result<Option<TodoRow>, ServiceError> {
        let mut rows = self.fetch(&Self::owned(user_id, todo_id)?).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Create a todo and return its id
    pub async fn insert(&self, user_id: i64, todo: NewTodo) -> Result<i64, ServiceError> {
        let record = todo.into_record(user_id, &now_timestamp());
        let id = self.executor.insert(TODOS_TABLE, &record).await?;
        tracing::debug!(user_id, todo_id = id, "Todo created");
        Ok(id)
    }

    /// Create several todos in one statement and return the last id
    ///
    /// An empty batch writes nothing and returns 0.
    pub async fn insert_many(&self, user_id: i64, todos: Vec<NewTodo>) -> Result<i64, ServiceError> {
        let now = now_timestamp();
        let records: Vec<Record> = todos
            .into_iter()
            .map(|todo| todo.into_record(user_id, &now))
            .collect();
        let last_id = self.executor.bulk_insert(TODOS_TABLE, &records).await?;
        tracing::debug!(user_id, count = records.len(), last_id, "Todos created");
        Ok(last_id)
    }

    /// Change title and/or description, returning the affected row count
    pub async fn update(
        &self,
        user_id: i64,
        todo_id: i64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<u64, ServiceError> {
        let mut data = Record::new();
        if let Some(title) = title {
            data.set("title", title);
        }
        if let Some(description) = description {
            data.set("description", description);
        }
        if !data.is_empty() {
            data.set("updated_at", now_timestamp());
        }

        let filter = Self::owned(user_id, todo_id)?;
        Ok(self.executor.update(TODOS_TABLE, &data, &filter).await?)
    }

    /// Whether the todo is completed; false when it does not exist
    pub async fn get_completion_status(
        &self,
        user_id: i64,
        todo_id: i64,
    ) -> Result<bool, ServiceError> {
        Ok(self.completion(user_id, todo_id).await?.unwrap_or(false))
    }

    async fn completion(&self, user_id: i64, todo_id: i64) -> Result<Option<bool>, ServiceError> {
        let filter = Self::owned(user_id, todo_id)?;
        let rows = self
            .executor
            .select_columns(TODOS_TABLE, &["completed"], Some(&filter))
            .await?;
        match rows.first() {
            Some(row) => Ok(Some(row.require_bool("completed")?)),
            None => Ok(None),
        }
    }

    /// Flip the completion flag and return the new state
    ///
    /// The write only lands while the flag still holds the value that was
    /// read; otherwise the flag is read again and the flip retried.
    pub async fn toggle_completion(&self, user_id: i64, todo_id: i64) -> Result<bool, ServiceError> {
        loop {
            let current = self
                .completion(user_id, todo_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("todo", todo_id))?;

            let data = Record::new()
                .with("completed", !current)
                .with("updated_at", now_timestamp());
            let filter = FilterBuilder::new()
                .eq("id", todo_id)
                .eq("user_id", user_id)
                .eq("completed", current)
                .build()?;
            if self.executor.update(TODOS_TABLE, &data, &filter).await? > 0 {
                return Ok(!current);
            }
            tracing::debug!(user_id, todo_id, "Completion changed underneath toggle, retrying");
        }
    }

    /// Delete a todo, returning the affected row count
    pub async fn delete(&self, user_id: i64, todo_id: i64) -> Result<u64, ServiceError> {
        let filter = Self::owned(user_id, todo_id)?;
        let deleted = self.executor.delete(TODOS_TABLE, &filter).await?;
        tracing::debug!(user_id, todo_id, deleted, "Todo delete");
        Ok(deleted)
    }
}

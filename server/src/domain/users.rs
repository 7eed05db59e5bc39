//! User service

use serde::Serialize;

use super::error::ServiceError;
use super::now_timestamp;
use crate::data::filter::{FilterBuilder, FilterError, LogicalOp};
use crate::data::query::QueryExecutor;
use crate::data::sqlite::SqliteRunner;
use crate::data::value::{DecodeError, Record};
use crate::utils::password::{hash_password, verify_password};

pub const USERS_TABLE: &str = "users";

/// A stored user. The password hash never serializes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<&Record> for UserRow {
    type Error = DecodeError;

    fn try_from(row: &Record) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.require_i64("id")?,
            name: row.require_str("name")?,
            email: row.require_str("email")?,
            password_hash: row.require_str("password_hash")?,
            created_at: row.require_str("created_at")?,
            updated_at: row.require_str("updated_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UserService {
    executor: QueryExecutor<SqliteRunner>,
}

impl UserService {
    pub fn new(runner: SqliteRunner) -> Self {
        Self {
            executor: QueryExecutor::new(runner),
        }
    }

    async fn first(&self, builder: FilterBuilder) -> Result<Option<UserRow>, ServiceError> {
        let filter = builder.build()?;
        let rows = self.executor.select_all(USERS_TABLE, Some(&filter)).await?;
        match rows.first() {
            Some(row) => Ok(Some(UserRow::try_from(row)?)),
            None => Ok(None),
        }
    }

    /// Create a user and return its id. The password is hashed before storage.
    pub async fn insert(&self, name: &str, email: &str, password: &str) -> Result<i64, ServiceError> {
        let now = now_timestamp();
        let record = Record::new()
            .with("name", name)
            .with("email", email)
            .with("password_hash", hash_password(password))
            .with("created_at", now.as_str())
            .with("updated_at", now);
        let id = self.executor.insert(USERS_TABLE, &record).await?;
        tracing::debug!(user_id = id, "User created");
        Ok(id)
    }

    pub async fn get(&self, user_id: i64) -> Result<Option<UserRow>, ServiceError> {
        self.first(FilterBuilder::new().eq("id", user_id)).await
    }

    /// First user matching the name or the email
    pub async fn get_by_name_or_email(
        &self,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserRow>, ServiceError> {
        let mut either = FilterBuilder::new();
        if let Some(name) = name {
            either = either.eq("name", name);
        }
        if let Some(email) = email {
            either = either.eq("email", email);
        }
        if name.is_none() && email.is_none() {
            return Err(FilterError::invalid("user lookup needs a name or an email").into());
        }
        self.first(FilterBuilder::new().add_nested(LogicalOp::Or, either))
            .await
    }

    /// Change any of name, email and password, returning the affected row count
    pub async fn update(
        &self,
        user_id: i64,
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<u64, ServiceError> {
        let mut data = Record::new();
        if let Some(name) = name {
            data.set("name", name);
        }
        if let Some(email) = email {
            data.set("email", email);
        }
        if let Some(password) = password {
            data.set("password_hash", hash_password(password));
        }
        if !data.is_empty() {
            data.set("updated_at", now_timestamp());
        }

        let filter = FilterBuilder::new().eq("id", user_id).build()?;
        Ok(self.executor.update(USERS_TABLE, &data, &filter).await?)
    }

    /// Delete a user and, through the foreign key, their todos
    pub async fn delete(&self, user_id: i64) -> Result<u64, ServiceError> {
        let filter = FilterBuilder::new().eq("id", user_id).build()?;
        let deleted = self.executor.delete(USERS_TABLE, &filter).await?;
        tracing::debug!(user_id, deleted, "User delete");
        Ok(deleted)
    }

    /// Check credentials and return the user id on success
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<i64>, ServiceError> {
        let filter = FilterBuilder::new().eq("email", email).build()?;
        let rows = self
            .executor
            .select_columns(USERS_TABLE, &["id", "password_hash"], Some(&filter))
            .await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        if verify_password(password, &row.require_str("password_hash")?)? {
            Ok(Some(row.require_i64("id")?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::DataError;
    use crate::data::query::QueryError;
    use crate::data::sqlite::SqliteService;
    use crate::domain::todos::{NewTodo, TodoService};

    async fn setup() -> (SqliteService, UserService) {
        let db = SqliteService::in_memory().await.unwrap();
        let users = UserService::new(db.runner());
        (db, users)
    }

    #[tokio::test]
    async fn test_insert_hashes_password() {
        let (_db, users) = setup().await;
        let id = users
            .insert("Ada", "ada@example.com", "correct horse")
            .await
            .unwrap();

        let user = users.get(id).await.unwrap().unwrap();
        assert_eq!(user.name, "Ada");
        assert_ne!(user.password_hash, "correct horse");
        assert!(user.password_hash.starts_with("pbkdf2_sha256$"));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (_db, users) = setup().await;
        users.insert("Ada", "ada@example.com", "pw123456").await.unwrap();

        let err = users
            .insert("Other", "ada@example.com", "pw123456")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Query(QueryError::Storage(DataError::Conflict(_)))
        ));
    }

    #[tokio::test]
    async fn test_get_by_name_or_email() {
        let (_db, users) = setup().await;
        let ada = users.insert("Ada", "ada@example.com", "pw123456").await.unwrap();
        let eve = users.insert("Eve", "eve@example.com", "pw123456").await.unwrap();

        let by_name = users.get_by_name_or_email(Some("Eve"), None).await.unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(eve));

        let by_email = users
            .get_by_name_or_email(None, Some("ada@example.com"))
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(ada));

        let either = users
            .get_by_name_or_email(Some("nobody"), Some("eve@example.com"))
            .await
            .unwrap();
        assert_eq!(either.map(|u| u.id), Some(eve));

        assert!(
            users
                .get_by_name_or_email(Some("nobody"), None)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_lookup_without_criteria_is_invalid() {
        let (_db, users) = setup().await;
        let err = users.get_by_name_or_email(None, None).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Query(QueryError::InvalidExpression(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let (_db, users) = setup().await;
        let id = users
            .insert("Ada", "ada@example.com", "correct horse")
            .await
            .unwrap();

        assert_eq!(
            users
                .authenticate("ada@example.com", "correct horse")
                .await
                .unwrap(),
            Some(id)
        );
        assert_eq!(
            users.authenticate("ada@example.com", "wrong").await.unwrap(),
            None
        );
        assert_eq!(
            users
                .authenticate("nobody@example.com", "correct horse")
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_update_password() {
        let (_db, users) = setup().await;
        let id = users.insert("Ada", "ada@example.com", "old-pass").await.unwrap();

        let affected = users
            .update(id, None, None, Some("new-pass"))
            .await
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(
            users.authenticate("ada@example.com", "new-pass").await.unwrap(),
            Some(id)
        );
        assert_eq!(
            users.authenticate("ada@example.com", "old-pass").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_update_without_fields_is_rejected() {
        let (_db, users) = setup().await;
        let id = users.insert("Ada", "ada@example.com", "pw123456").await.unwrap();
        let err = users.update(id, None, None, None).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Query(QueryError::MissingUpdateData { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_todos() {
        let (db, users) = setup().await;
        let id = users.insert("Ada", "ada@example.com", "pw123456").await.unwrap();
        let todos = TodoService::new(db.runner());
        todos
            .insert(
                id,
                NewTodo {
                    title: "x".into(),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(users.delete(id).await.unwrap(), 1);
        assert!(users.get(id).await.unwrap().is_none());
        assert!(todos.get_all(id).await.unwrap().is_empty());
        assert_eq!(users.delete(id).await.unwrap(), 0);
    }
}

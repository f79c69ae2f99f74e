//! User accounts: records and the `UserStore` port

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::StoreError;

/// User record from the store. The password hash never leaves the API layer.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Port for user persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `StoreError::UniqueViolation` when the
    /// email is already registered.
    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Fetch a user by id
    async fn get_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError>;

    /// Fetch a user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
}

#[cfg(feature = "sqlite")]
pub use sqlite::UsersRepository;

#[cfg(feature = "sqlite")]
mod sqlite {
    use anyhow::anyhow;
    use sqlx::SqlitePool;

    use super::*;
    use crate::db::sqlite_helpers::{now_iso8601, str_to_datetime, unique_or_backend};

    impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for UserRecord {
        fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
            use sqlx::Row;

            let created_str: String = row.try_get("created_at")?;

            Ok(Self {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                password_hash: row.try_get("password_hash")?,
                created_at: str_to_datetime(&created_str)
                    .map_err(|e| sqlx::Error::Decode(e.into()))?,
            })
        }
    }

    /// SQLite-backed user store
    pub struct UsersRepository {
        pool: SqlitePool,
    }

    impl UsersRepository {
        pub fn new(pool: SqlitePool) -> Self {
            Self { pool }
        }
    }

    #[async_trait]
    impl UserStore for UsersRepository {
        async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
            let result = sqlx::query(
                "INSERT INTO users (name, email, password_hash, created_at)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(now_iso8601())
            .execute(&self.pool)
            .await
            .map_err(unique_or_backend("users.email"))?;

            let id = result.last_insert_rowid();
            self.get_by_id(id)
                .await?
                .ok_or_else(|| StoreError::Backend(anyhow!("user {} missing after insert", id)))
        }

        async fn get_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
            let user = sqlx::query_as::<_, UserRecord>(
                "SELECT id, name, email, password_hash, created_at FROM users WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(user)
        }

        async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
            let user = sqlx::query_as::<_, UserRecord>(
                "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?",
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

            Ok(user)
        }
    }
}

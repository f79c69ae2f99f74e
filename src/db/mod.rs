//! Data access layer
//!
//! Persistence sits behind the `UserStore` and `LinkStore` ports so the
//! GraphQL layer never touches a concrete backend. Two backends implement
//! them: SQLite repositories (feature `sqlite`, on by default) and an
//! in-process memory store.

pub mod links;
pub mod memory;
pub mod seed;
#[cfg(feature = "sqlite")]
pub mod sqlite_helpers;
pub mod users;

use std::sync::Arc;

use thiserror::Error;

#[cfg(feature = "sqlite")]
pub use links::LinksRepository;
pub use links::{LinkOrder, LinkOrderField, LinkQuery, LinkRecord, LinkStore, NewLink, UpdateLink};
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use users::UsersRepository;
pub use users::{NewUser, UserRecord, UserStore};

/// Errors reported by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated on {0}")]
    UniqueViolation(&'static str),
    /// Any other backend failure.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(anyhow::Error::new(e))
    }
}

/// Database handle bundling the concrete stores behind their ports.
#[derive(Clone)]
pub struct Database {
    users: Arc<dyn UserStore>,
    links: Arc<dyn LinkStore>,
}

impl Database {
    /// Get the maximum connection pool size from environment or default
    #[cfg(feature = "sqlite")]
    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    }

    /// Create a new database connection pool and ensure the schema exists
    #[cfg(feature = "sqlite")]
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        use std::str::FromStr;

        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(Self::get_max_connections())
            .connect_with(options)
            .await?;

        init_schema(&pool).await?;

        Ok(Self {
            users: Arc::new(UsersRepository::new(pool.clone())),
            links: Arc::new(LinksRepository::new(pool)),
        })
    }

    /// Fully in-process backend. Used by tests and as a no-database run mode.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            links: store,
        }
    }

    /// Access user operations
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// Access link operations (including votes)
    pub fn links(&self) -> &dyn LinkStore {
        self.links.as_ref()
    }
}

/// Create missing tables. Statements are idempotent so startup always runs them.
#[cfg(feature = "sqlite")]
async fn init_schema(pool: &sqlx::SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS links (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            url TEXT NOT NULL,
            created_at TEXT NOT NULL,
            posted_by_id INTEGER REFERENCES users(id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS votes (
            link_id INTEGER NOT NULL REFERENCES links(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            PRIMARY KEY (link_id, user_id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_links_posted_by ON links(posted_by_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_votes_user ON votes(user_id)")
        .execute(pool)
        .await?;

    tracing::debug!("Database schema ready");

    Ok(())
}

//! Links: records, list parameters, and the `LinkStore` port
//!
//! Votes live here too since they are a relation on links (who voted on
//! what) rather than a standalone aggregate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::StoreError;
use super::users::UserRecord;

/// Link record from the store
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRecord {
    pub id: i64,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    /// Author id; links created outside a session have none
    pub posted_by_id: Option<i64>,
}

/// Data for creating a new link
#[derive(Debug, Clone)]
pub struct NewLink {
    pub description: String,
    pub url: String,
    pub posted_by_id: Option<i64>,
}

/// Partial update for a link. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateLink {
    pub description: Option<String>,
    pub url: Option<String>,
}

/// Sortable link columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOrderField {
    Description,
    Url,
    CreatedAt,
}

impl LinkOrderField {
    /// Column name for ORDER BY clauses
    pub fn column(&self) -> &'static str {
        match self {
            LinkOrderField::Description => "description",
            LinkOrderField::Url => "url",
            LinkOrderField::CreatedAt => "created_at",
        }
    }
}

/// One sort key; earlier keys win, later keys break their ties
#[derive(Debug, Clone, Copy)]
pub struct LinkOrder {
    pub field: LinkOrderField,
    pub ascending: bool,
}

/// Parameters for listing links.
///
/// `filter` is a substring match against description or url. A negative or
/// absent `take` means no limit; a negative or absent `skip` means no
/// offset. Results always end with an `id ASC` tiebreak so pagination over
/// ties is deterministic.
#[derive(Debug, Clone, Default)]
pub struct LinkQuery {
    pub filter: Option<String>,
    pub take: Option<i64>,
    pub skip: Option<i64>,
    pub order_by: Vec<LinkOrder>,
}

impl LinkQuery {
    /// LIMIT value after normalization (-1 is SQLite for "no limit")
    pub(crate) fn limit(&self) -> i64 {
        match self.take {
            Some(take) if take >= 0 => take,
            _ => -1,
        }
    }

    /// OFFSET value after normalization
    pub(crate) fn offset(&self) -> i64 {
        match self.skip {
            Some(skip) if skip > 0 => skip,
            _ => 0,
        }
    }
}

/// Port for link persistence, including the vote relation.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert a new link
    async fn create(&self, link: NewLink) -> Result<LinkRecord, StoreError>;

    /// Fetch a link by id
    async fn get_by_id(&self, id: i64) -> Result<Option<LinkRecord>, StoreError>;

    /// List links with filter, ordering, and pagination applied
    async fn list(&self, query: &LinkQuery) -> Result<Vec<LinkRecord>, StoreError>;

    /// Count links matching `filter`, ignoring pagination
    async fn count(&self, filter: Option<&str>) -> Result<i64, StoreError>;

    /// Apply a partial update. `None` when the link does not exist.
    async fn update(&self, id: i64, changes: UpdateLink) -> Result<Option<LinkRecord>, StoreError>;

    /// Delete a link and its votes. Returns the removed record, `None` when absent.
    async fn delete(&self, id: i64) -> Result<Option<LinkRecord>, StoreError>;

    /// Record a vote by `user_id` on `link_id`. Fails with
    /// `StoreError::UniqueViolation` when that pair already voted.
    async fn add_voter(&self, link_id: i64, user_id: i64) -> Result<(), StoreError>;

    /// Users who voted on the link, ordered by user id
    async fn voters(&self, link_id: i64) -> Result<Vec<UserRecord>, StoreError>;

    /// Links posted by the user, ordered by link id
    async fn links_by_author(&self, user_id: i64) -> Result<Vec<LinkRecord>, StoreError>;

    /// Links the user has voted on, ordered by link id
    async fn votes_by_user(&self, user_id: i64) -> Result<Vec<LinkRecord>, StoreError>;
}

#[cfg(feature = "sqlite")]
pub use sqlite::LinksRepository;

#[cfg(feature = "sqlite")]
mod sqlite {
    use sqlx::SqlitePool;

    use super::*;
    use crate::db::sqlite_helpers::{now_iso8601, str_to_datetime, unique_or_backend};

    const LINK_COLUMNS: &str = "id, description, url, created_at, posted_by_id";

    impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for LinkRecord {
        fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
            use sqlx::Row;

            let created_str: String = row.try_get("created_at")?;

            Ok(Self {
                id: row.try_get("id")?,
                description: row.try_get("description")?,
                url: row.try_get("url")?,
                created_at: str_to_datetime(&created_str)
                    .map_err(|e| sqlx::Error::Decode(e.into()))?,
                posted_by_id: row.try_get("posted_by_id")?,
            })
        }
    }

    /// SQLite-backed link store
    pub struct LinksRepository {
        pool: SqlitePool,
    }

    impl LinksRepository {
        pub fn new(pool: SqlitePool) -> Self {
            Self { pool }
        }
    }

    #[async_trait]
    impl LinkStore for LinksRepository {
        async fn create(&self, link: NewLink) -> Result<LinkRecord, StoreError> {
            let result = sqlx::query(
                "INSERT INTO links (description, url, created_at, posted_by_id)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&link.description)
            .bind(&link.url)
            .bind(now_iso8601())
            .bind(link.posted_by_id)
            .execute(&self.pool)
            .await?;

            let id = result.last_insert_rowid();
            self.get_by_id(id).await?.ok_or_else(|| {
                StoreError::Backend(anyhow::anyhow!("link {} missing after insert", id))
            })
        }

        async fn get_by_id(&self, id: i64) -> Result<Option<LinkRecord>, StoreError> {
            let link = sqlx::query_as::<_, LinkRecord>(&format!(
                "SELECT {LINK_COLUMNS} FROM links WHERE id = ?"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(link)
        }

        async fn list(&self, query: &LinkQuery) -> Result<Vec<LinkRecord>, StoreError> {
            let where_clause = if query.filter.is_some() {
                "(description LIKE ? OR url LIKE ?)"
            } else {
                "1=1"
            };

            // Requested keys first, id last so ties stay deterministic
            let mut order_parts: Vec<String> = query
                .order_by
                .iter()
                .map(|order| {
                    format!(
                        "{} {}",
                        order.field.column(),
                        if order.ascending { "ASC" } else { "DESC" }
                    )
                })
                .collect();
            order_parts.push("id ASC".to_string());

            let sql = format!(
                "SELECT {LINK_COLUMNS} FROM links WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
                where_clause,
                order_parts.join(", "),
                query.limit(),
                query.offset(),
            );

            let mut data_query = sqlx::query_as::<_, LinkRecord>(&sql);
            if let Some(filter) = &query.filter {
                let pattern = format!("%{}%", filter);
                data_query = data_query.bind(pattern.clone()).bind(pattern);
            }

            Ok(data_query.fetch_all(&self.pool).await?)
        }

        async fn count(&self, filter: Option<&str>) -> Result<i64, StoreError> {
            let count = if let Some(filter) = filter {
                let pattern = format!("%{}%", filter);
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM links WHERE description LIKE ? OR url LIKE ?",
                )
                .bind(pattern.clone())
                .bind(pattern)
                .fetch_one(&self.pool)
                .await?
            } else {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
                    .fetch_one(&self.pool)
                    .await?
            };

            Ok(count)
        }

        async fn update(
            &self,
            id: i64,
            changes: UpdateLink,
        ) -> Result<Option<LinkRecord>, StoreError> {
            let mut sets = Vec::new();
            if changes.description.is_some() {
                sets.push("description = ?");
            }
            if changes.url.is_some() {
                sets.push("url = ?");
            }

            // No fields supplied: still resolve the target so absence reports as such
            if sets.is_empty() {
                return self.get_by_id(id).await;
            }

            let sql = format!("UPDATE links SET {} WHERE id = ?", sets.join(", "));
            let mut update_query = sqlx::query(&sql);
            if let Some(description) = &changes.description {
                update_query = update_query.bind(description);
            }
            if let Some(url) = &changes.url {
                update_query = update_query.bind(url);
            }

            let result = update_query.bind(id).execute(&self.pool).await?;
            if result.rows_affected() == 0 {
                return Ok(None);
            }

            self.get_by_id(id).await
        }

        async fn delete(&self, id: i64) -> Result<Option<LinkRecord>, StoreError> {
            let Some(link) = self.get_by_id(id).await? else {
                return Ok(None);
            };

            let mut tx = self.pool.begin().await?;
            sqlx::query("DELETE FROM votes WHERE link_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM links WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            Ok(Some(link))
        }

        async fn add_voter(&self, link_id: i64, user_id: i64) -> Result<(), StoreError> {
            sqlx::query("INSERT INTO votes (link_id, user_id) VALUES (?, ?)")
                .bind(link_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(unique_or_backend("votes(link_id, user_id)"))?;

            Ok(())
        }

        async fn voters(&self, link_id: i64) -> Result<Vec<UserRecord>, StoreError> {
            let users = sqlx::query_as::<_, UserRecord>(
                "SELECT u.id, u.name, u.email, u.password_hash, u.created_at
                 FROM users u
                 JOIN votes v ON v.user_id = u.id
                 WHERE v.link_id = ?
                 ORDER BY u.id",
            )
            .bind(link_id)
            .fetch_all(&self.pool)
            .await?;

            Ok(users)
        }

        async fn links_by_author(&self, user_id: i64) -> Result<Vec<LinkRecord>, StoreError> {
            let links = sqlx::query_as::<_, LinkRecord>(&format!(
                "SELECT {LINK_COLUMNS} FROM links WHERE posted_by_id = ? ORDER BY id"
            ))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

            Ok(links)
        }

        async fn votes_by_user(&self, user_id: i64) -> Result<Vec<LinkRecord>, StoreError> {
            let links = sqlx::query_as::<_, LinkRecord>(
                "SELECT l.id, l.description, l.url, l.created_at, l.posted_by_id
                 FROM links l
                 JOIN votes v ON v.link_id = l.id
                 WHERE v.user_id = ?
                 ORDER BY l.id",
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

            Ok(links)
        }
    }
}

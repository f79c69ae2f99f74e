//! GraphQL type definitions
//!
//! These mirror the store records but carry the API surface: relational
//! fields (author, voters, votes) resolve through the store ports at
//! field-resolution time, and the password hash never appears here.

use async_graphql::{Context, Enum, ErrorExtensions, ID, InputObject, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};

use crate::db::{Database, LinkRecord, UserRecord};

use super::errors::ApiError;

// ============================================================================
// Entities
// ============================================================================

/// A registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}

#[Object]
impl User {
    async fn id(&self) -> i64 {
        self.id
    }

    async fn name(&self) -> &str {
        &self.name
    }

    async fn email(&self) -> &str {
        &self.email
    }

    /// Links this user has posted
    async fn links(&self, ctx: &Context<'_>) -> Result<Vec<Link>> {
        let db = ctx.data_unchecked::<Database>();
        let links = db
            .links()
            .links_by_author(self.id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(links.into_iter().map(Link::from).collect())
    }

    /// Links this user has voted on
    async fn votes(&self, ctx: &Context<'_>) -> Result<Vec<Link>> {
        let db = ctx.data_unchecked::<Database>();
        let links = db
            .links()
            .votes_by_user(self.id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(links.into_iter().map(Link::from).collect())
    }
}

/// A shared link
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub posted_by_id: Option<i64>,
}

impl From<LinkRecord> for Link {
    fn from(record: LinkRecord) -> Self {
        Self {
            id: record.id,
            description: record.description,
            url: record.url,
            created_at: record.created_at,
            posted_by_id: record.posted_by_id,
        }
    }
}

#[Object]
impl Link {
    async fn id(&self) -> i64 {
        self.id
    }

    async fn description(&self) -> &str {
        &self.description
    }

    async fn url(&self) -> &str {
        &self.url
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The user who posted this link; null for links without an author
    async fn posted_by(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(user_id) = self.posted_by_id else {
            return Ok(None);
        };

        let db = ctx.data_unchecked::<Database>();
        let user = db
            .users()
            .get_by_id(user_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(user.map(User::from))
    }

    /// Users who voted on this link
    async fn voters(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let db = ctx.data_unchecked::<Database>();
        let users = db
            .links()
            .voters(self.id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(users.into_iter().map(User::from).collect())
    }
}

// ============================================================================
// Operation Payloads
// ============================================================================

/// Bearer token plus the account it names, returned by signup and login
#[derive(Debug, SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// A recorded vote: the link and the user who cast it
#[derive(Debug, SimpleObject)]
pub struct Vote {
    pub link: Link,
    pub user: User,
}

/// A page of links plus the total match count and a client cache key
#[derive(Debug, SimpleObject)]
pub struct LinkFeed {
    pub links: Vec<Link>,
    /// Total links matching the filter, ignoring pagination
    pub count: i64,
    /// Deterministic id derived from the query arguments
    pub id: ID,
}

// ============================================================================
// Inputs
// ============================================================================

/// Order direction for sorting
#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum OrderDirection {
    /// Ascending order (A-Z, 1-9, oldest-newest)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest-oldest)
    Desc,
}

/// Sortable link fields
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum LinkSortField {
    Description,
    Url,
    CreatedAt,
}

/// One orderBy key for link listings; earlier keys take priority on ties
#[derive(Debug, Clone, Copy, InputObject)]
pub struct LinkOrderByInput {
    /// Field to sort on
    pub field: LinkSortField,
    /// Sort direction (default ascending)
    pub direction: Option<OrderDirection>,
}

//! In-process store backend
//!
//! Implements the same ports as the SQLite repositories over plain maps
//! behind a `parking_lot::RwLock`. Used as the test double for the GraphQL
//! layer and as a no-database run mode. Listing matches the SQLite ordering
//! contract (requested keys in sequence, id as the final tiebreak); the one
//! divergence is the filter, which here is a case-sensitive substring match
//! while SQLite's LIKE ignores ASCII case.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::StoreError;
use super::links::{LinkOrder, LinkOrderField, LinkQuery, LinkRecord, LinkStore, NewLink, UpdateLink};
use super::users::{NewUser, UserRecord, UserStore};

#[derive(Default)]
struct State {
    users: BTreeMap<i64, UserRecord>,
    links: BTreeMap<i64, LinkRecord>,
    /// (link_id, user_id) pairs; uniqueness enforced on insert
    votes: Vec<(i64, i64)>,
    next_user_id: i64,
    next_link_id: i64,
}

/// In-memory implementation of both store ports
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_user_id: 1,
                next_link_id: 1,
                ..Default::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filter(link: &LinkRecord, filter: Option<&str>) -> bool {
    match filter {
        Some(filter) => link.description.contains(filter) || link.url.contains(filter),
        None => true,
    }
}

fn sort_links(links: &mut [LinkRecord], order_by: &[LinkOrder]) {
    // Input arrives in id order; the stable sort keeps that as the tiebreak
    links.sort_by(|a, b| {
        for key in order_by {
            let ordering = match key.field {
                LinkOrderField::Description => a.description.cmp(&b.description),
                LinkOrderField::Url => a.url.cmp(&b.url),
                LinkOrderField::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            let ordering = if key.ascending {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut state = self.state.write();

        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users.email"));
        }

        let id = state.next_user_id;
        state.next_user_id += 1;

        let record = UserRecord {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        state.users.insert(id, record.clone());

        Ok(record)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.state.read().users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let state = self.state.read();
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn create(&self, link: NewLink) -> Result<LinkRecord, StoreError> {
        let mut state = self.state.write();

        let id = state.next_link_id;
        state.next_link_id += 1;

        let record = LinkRecord {
            id,
            description: link.description,
            url: link.url,
            created_at: Utc::now(),
            posted_by_id: link.posted_by_id,
        };
        state.links.insert(id, record.clone());

        Ok(record)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<LinkRecord>, StoreError> {
        Ok(self.state.read().links.get(&id).cloned())
    }

    async fn list(&self, query: &LinkQuery) -> Result<Vec<LinkRecord>, StoreError> {
        let state = self.state.read();

        // BTreeMap iteration yields id order
        let mut links: Vec<LinkRecord> = state
            .links
            .values()
            .filter(|link| matches_filter(link, query.filter.as_deref()))
            .cloned()
            .collect();
        drop(state);

        sort_links(&mut links, &query.order_by);

        let skip = query.offset() as usize;
        let take = match query.limit() {
            limit if limit < 0 => usize::MAX,
            limit => limit as usize,
        };

        Ok(links.into_iter().skip(skip).take(take).collect())
    }

    async fn count(&self, filter: Option<&str>) -> Result<i64, StoreError> {
        let state = self.state.read();
        let count = state
            .links
            .values()
            .filter(|link| matches_filter(link, filter))
            .count();

        Ok(count as i64)
    }

    async fn update(&self, id: i64, changes: UpdateLink) -> Result<Option<LinkRecord>, StoreError> {
        let mut state = self.state.write();

        let Some(link) = state.links.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(description) = changes.description {
            link.description = description;
        }
        if let Some(url) = changes.url {
            link.url = url;
        }

        Ok(Some(link.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<LinkRecord>, StoreError> {
        let mut state = self.state.write();

        let removed = state.links.remove(&id);
        if removed.is_some() {
            state.votes.retain(|(link_id, _)| *link_id != id);
        }

        Ok(removed)
    }

    async fn add_voter(&self, link_id: i64, user_id: i64) -> Result<(), StoreError> {
        let mut state = self.state.write();

        if !state.links.contains_key(&link_id) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "link {} does not exist",
                link_id
            )));
        }
        if !state.users.contains_key(&user_id) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "user {} does not exist",
                user_id
            )));
        }
        if state.votes.contains(&(link_id, user_id)) {
            return Err(StoreError::UniqueViolation("votes(link_id, user_id)"));
        }

        state.votes.push((link_id, user_id));

        Ok(())
    }

    async fn voters(&self, link_id: i64) -> Result<Vec<UserRecord>, StoreError> {
        let state = self.state.read();

        let mut user_ids: Vec<i64> = state
            .votes
            .iter()
            .filter(|(l, _)| *l == link_id)
            .map(|(_, u)| *u)
            .collect();
        user_ids.sort_unstable();

        Ok(user_ids
            .into_iter()
            .filter_map(|id| state.users.get(&id).cloned())
            .collect())
    }

    async fn links_by_author(&self, user_id: i64) -> Result<Vec<LinkRecord>, StoreError> {
        let state = self.state.read();

        Ok(state
            .links
            .values()
            .filter(|link| link.posted_by_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn votes_by_user(&self, user_id: i64) -> Result<Vec<LinkRecord>, StoreError> {
        let state = self.state.read();

        let mut link_ids: Vec<i64> = state
            .votes
            .iter()
            .filter(|(_, u)| *u == user_id)
            .map(|(l, _)| *l)
            .collect();
        link_ids.sort_unstable();

        Ok(link_ids
            .into_iter()
            .filter_map(|id| state.links.get(&id).cloned())
            .collect())
    }
}

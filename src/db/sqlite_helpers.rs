//! SQLite helper utilities for type conversion
//!
//! SQLite has no native timestamp type, so timestamps are stored as RFC3339
//! TEXT columns and converted at the row boundary.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};

use crate::db::StoreError;

/// Current time as an RFC3339 string for TEXT column storage
#[inline]
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

/// Parse an RFC3339 TEXT column back to a DateTime
#[inline]
pub fn str_to_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("Invalid datetime '{}': {}", s, e))
}

/// Map a sqlx error to `UniqueViolation` when a uniqueness constraint fired,
/// anything else to a backend error.
pub(crate) fn unique_or_backend(constraint: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::UniqueViolation(constraint),
        _ => StoreError::Backend(e.into()),
    }
}

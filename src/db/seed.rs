//! Demo seed data for local development.
//!
//! Inserts a demo account and a few sample links so a fresh instance has
//! something to query. Skipped entirely once any link exists, so re-runs
//! are idempotent.

use anyhow::Context;
use tracing::info;

use super::{Database, NewLink, NewUser};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "changeme";

const DEMO_LINKS: &[(&str, &str)] = &[
    ("www.howtographql.com", "Fullstack tutorial for GraphQL"),
    ("www.bbc.co.uk", "A BBC thing"),
    ("www.nice-cats.com", "dunno *who* put this here"),
];

/// Seed demo data when the store is empty.
pub async fn run_seeds(db: &Database) -> anyhow::Result<()> {
    if db.links().count(None).await? > 0 {
        return Ok(());
    }

    let demo_user = match db.users().get_by_email(DEMO_EMAIL).await? {
        Some(user) => user,
        None => {
            let password_hash = bcrypt::hash(DEMO_PASSWORD, bcrypt::DEFAULT_COST)
                .context("Failed to hash demo password")?;
            db.users()
                .create(NewUser {
                    name: "Demo".to_string(),
                    email: DEMO_EMAIL.to_string(),
                    password_hash,
                })
                .await?
        }
    };

    for (url, description) in DEMO_LINKS {
        db.links()
            .create(NewLink {
                description: description.to_string(),
                url: url.to_string(),
                posted_by_id: Some(demo_user.id),
            })
            .await?;
    }

    info!(
        count = DEMO_LINKS.len(),
        user = DEMO_EMAIL,
        "Seeded demo links"
    );

    Ok(())
}

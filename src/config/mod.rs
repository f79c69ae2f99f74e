//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Database URL (SQLite), e.g. `sqlite://linkboard.db`
    pub database_url: String,

    /// JWT secret for token signing and verification
    pub jwt_secret: String,

    /// Bearer token lifetime in seconds
    pub token_lifetime: i64,

    /// Bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,

    /// Insert demo data on startup when the store is empty
    pub seed_demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://linkboard.db".to_string()),

            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),

            token_lifetime: env::var("TOKEN_LIFETIME_SECS")
                .unwrap_or_else(|_| (7 * 24 * 60 * 60).to_string())
                .parse()
                .context("Invalid TOKEN_LIFETIME_SECS")?,

            bcrypt_cost: env::var("BCRYPT_COST")
                .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
                .parse()
                .context("Invalid BCRYPT_COST")?,

            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}

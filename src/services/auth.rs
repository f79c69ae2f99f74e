//! Authentication service for account management and JWT handling
//!
//! Provides:
//! - Signup and login
//! - Password hashing with bcrypt
//! - Bearer token generation and validation (HS256)

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::{Database, NewUser, StoreError, UserRecord};
use crate::graphql::auth::AuthUser;
use crate::graphql::errors::ApiError;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims carried by bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id (subject), as a decimal string
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Result of signup or login: a bearer token plus the account it names
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: UserRecord,
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret. Rotating it invalidates every outstanding token.
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 7 days)
    pub token_lifetime: i64,
    /// Bcrypt cost factor (default: 12)
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            token_lifetime: 7 * 24 * 60 * 60,
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_lifetime: config.token_lifetime,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Register a new account and log it in
    pub async fn signup(
        &self,
        email: String,
        name: String,
        password: String,
    ) -> Result<AuthSession, ApiError> {
        let password_hash = self.hash_password(&password)?;

        let user = self
            .db
            .users()
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => ApiError::DuplicateEmail,
                other => ApiError::from(other),
            })?;

        let token = self.issue_token(user.id)?;
        Ok(AuthSession { token, user })
    }

    /// Login with email and password.
    ///
    /// Unknown email and wrong password report the same error so the
    /// response does not reveal which part was wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let user = self
            .db
            .users()
            .get_by_email(email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.issue_token(user.id)?;
        Ok(AuthSession { token, user })
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Issue a signed bearer token for a user id
    pub fn issue_token(&self, user_id: i64) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.token_lifetime)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Decode an Authorization header value into the caller identity.
    ///
    /// The value must be `Bearer <token>`; a missing prefix, bad signature,
    /// expired token, or non-numeric subject all report `InvalidToken`.
    pub fn decode_auth_header(&self, header_value: &str) -> Result<AuthUser, ApiError> {
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::InvalidToken("missing Bearer prefix".to_string()))?;

        self.decode_token(token)
    }

    /// Validate a bearer token and extract the user id it names
    pub fn decode_token(&self, token: &str) -> Result<AuthUser, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::InvalidToken(e.to_string()))?;

        let user_id = token_data.claims.sub.parse::<i64>().map_err(|_| {
            ApiError::InvalidToken(format!(
                "subject '{}' is not a user id",
                token_data.claims.sub
            ))
        })?;

        Ok(AuthUser { user_id })
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Hash a password with bcrypt
    fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        hash(password, self.config.bcrypt_cost)
            .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Verify a password against a stored hash
    fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, ApiError> {
        verify(password, password_hash)
            .map_err(|e| ApiError::Internal(format!("Failed to verify password: {}", e)))
    }
}

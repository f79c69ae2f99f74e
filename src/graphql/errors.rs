//! Typed API errors and their GraphQL representation
//!
//! Every operation fails with one of these kinds. Each is surfaced to
//! clients with a machine-readable `code` and an HTTP-status hint in the
//! response extensions, so the transport always stays 200 while the error
//! class remains visible.

use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::db::StoreError;

/// Error kinds an API operation can report
#[derive(Debug, Error)]
pub enum ApiError {
    /// A gated operation was called without a caller identity
    #[error("User is not authenticated")]
    Unauthenticated,
    /// Login failed. One message for unknown email and wrong password.
    #[error("Incorrect email or password")]
    InvalidCredentials,
    /// Signup with an email that is already registered
    #[error("Email is already registered")]
    DuplicateEmail,
    /// Update or delete aimed at a link that does not exist
    #[error("Link {0} not found")]
    NotFound(i64),
    /// Vote aimed at a link that does not exist
    #[error("Unable to vote for link {0}. Does it exist?")]
    LinkNotFound(i64),
    /// Second vote by the same user on the same link
    #[error("Already voted for link {0}")]
    DuplicateVote(i64),
    /// Authorization header present but unusable
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    /// Non-store internal failure (hashing, token signing)
    #[error("Internal error: {0}")]
    Internal(String),
    /// Store backend failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Machine-readable code exposed in response extensions
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::DuplicateEmail => "DUPLICATE_EMAIL",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::LinkNotFound(_) => "LINK_NOT_FOUND",
            ApiError::DuplicateVote(_) => "DUPLICATE_VOTE",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::Internal(_) | ApiError::Store(_) => "INTERNAL",
        }
    }

    /// HTTP status hint mirrored into response extensions
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Unauthenticated
            | ApiError::InvalidCredentials
            | ApiError::InvalidToken(_) => 401,
            ApiError::NotFound(_) | ApiError::LinkNotFound(_) => 404,
            ApiError::DuplicateEmail | ApiError::DuplicateVote(_) => 409,
            ApiError::Internal(_) | ApiError::Store(_) => 500,
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            e.set("http", self.status());
        })
    }
}

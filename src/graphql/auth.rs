//! GraphQL caller identity
//!
//! The HTTP layer verifies the Authorization header and injects an
//! `AuthUser` into the request data. Resolvers read it through `AuthExt`;
//! gated operations fail with `Unauthenticated` when it is absent.

use async_graphql::Context;

use super::errors::ApiError;

/// Identity extracted from a verified bearer token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Extension trait to get the authenticated caller from the GraphQL context
pub trait AuthExt {
    /// The authenticated caller, or `Unauthenticated` when the request
    /// carried no usable identity
    fn auth_user(&self) -> Result<AuthUser, ApiError>;
}

impl AuthExt for Context<'_> {
    fn auth_user(&self) -> Result<AuthUser, ApiError> {
        self.data_opt::<AuthUser>()
            .copied()
            .ok_or(ApiError::Unauthenticated)
    }
}

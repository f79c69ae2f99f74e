//! Service layer sitting between the GraphQL resolvers and the stores

pub mod auth;

pub use auth::{AuthConfig, AuthService, AuthSession};

//! GraphQL API surface
//!
//! This is the single API surface of the service. Queries and mutations are
//! defined in per-domain modules under `queries/` and `mutations/` (each a
//! `#[derive(Default)]` struct with an `#[Object]` impl) and merged into
//! `QueryRoot`/`MutationRoot` in `schema.rs`. Resolvers reach persistence
//! only through the store ports in [`crate::db`], and read the caller
//! identity the HTTP layer injects into the request data.

pub mod auth;
pub mod errors;
mod helpers;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{AuthExt, AuthUser};
pub use errors::ApiError;
pub use schema::{LinkboardSchema, MutationRoot, QueryRoot, build_schema};

pub mod auth;
pub mod links;
pub mod vote;

pub use auth::AuthMutations;
pub use links::LinkMutations;
pub use vote::VoteMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::db::{Database, NewLink, StoreError, UpdateLink};
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::errors::ApiError;
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::AuthService;
}

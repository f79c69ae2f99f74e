pub mod links;

pub use links::LinkQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, ID, Object, Result};

    pub(crate) use crate::db::{Database, LinkQuery};
    pub(crate) use crate::graphql::errors::ApiError;
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
}

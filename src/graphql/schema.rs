//! GraphQL schema assembly
//!
//! Per-domain query and mutation structs are merged into the root objects
//! here; the store handle and auth service ride in schema data so every
//! resolver reaches them through the context.

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::AuthService;

use super::mutations::{AuthMutations, LinkMutations, VoteMutations};
use super::queries::LinkQueries;

/// The GraphQL schema type
pub type LinkboardSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// All root queries
#[derive(MergedObject, Default)]
pub struct QueryRoot(LinkQueries);

/// All root mutations
#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutations, LinkMutations, VoteMutations);

/// Build the GraphQL schema with all resolvers and shared context data
pub fn build_schema(db: Database, auth: AuthService) -> LinkboardSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(db)
    .data(auth)
    .finish()
}

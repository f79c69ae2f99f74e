// Helper functions shared across GraphQL query/mutation modules.

use crate::db::{LinkOrder, LinkOrderField};
use crate::graphql::types::{LinkOrderByInput, LinkSortField, OrderDirection};

/// Convert orderBy inputs to store-level sort keys
pub(crate) fn order_by_to_db(order_by: Option<Vec<LinkOrderByInput>>) -> Vec<LinkOrder> {
    order_by
        .unwrap_or_default()
        .into_iter()
        .map(|input| LinkOrder {
            field: match input.field {
                LinkSortField::Description => LinkOrderField::Description,
                LinkSortField::Url => LinkOrderField::Url,
                LinkSortField::CreatedAt => LinkOrderField::CreatedAt,
            },
            ascending: input.direction.unwrap_or_default() == OrderDirection::Asc,
        })
        .collect()
}

/// Deterministic feed id serialized from the query arguments
pub(crate) fn feed_id(filter: Option<&str>, take: Option<i32>, skip: Option<i32>) -> String {
    let args = serde_json::json!({
        "filter": filter,
        "skip": skip,
        "take": take,
    });
    format!("main-feed:{}", args)
}

//! Link queries: the public listing surface
//!
//! All three operations are public; no caller identity is required.

use super::prelude::*;

#[derive(Default)]
pub struct LinkQueries;

#[Object]
impl LinkQueries {
    /// List links, optionally filtered, ordered, and paginated.
    ///
    /// `filter` matches description or url as a substring. Negative or
    /// absent `take`/`skip` mean no limit/offset. Ties beyond the requested
    /// keys always resolve in id order.
    async fn fetch_all_links(
        &self,
        ctx: &Context<'_>,
        filter: Option<String>,
        take: Option<i32>,
        skip: Option<i32>,
        order_by: Option<Vec<LinkOrderByInput>>,
    ) -> Result<Vec<Link>> {
        let db = ctx.data_unchecked::<Database>();

        let query = LinkQuery {
            filter,
            take: take.map(i64::from),
            skip: skip.map(i64::from),
            order_by: order_by_to_db(order_by),
        };
        let links = db
            .links()
            .list(&query)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(links.into_iter().map(Link::from).collect())
    }

    /// A page of links plus the total match count and a cache id.
    ///
    /// The page honors `filter`/`take`/`skip` in insertion order; `count`
    /// applies the same filter but ignores pagination.
    #[graphql(name = "LinkFeed")]
    async fn link_feed(
        &self,
        ctx: &Context<'_>,
        filter: Option<String>,
        take: Option<i32>,
        skip: Option<i32>,
    ) -> Result<LinkFeed> {
        let db = ctx.data_unchecked::<Database>();

        let query = LinkQuery {
            filter: filter.clone(),
            take: take.map(i64::from),
            skip: skip.map(i64::from),
            order_by: Vec::new(),
        };
        let links = db
            .links()
            .list(&query)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        let count = db
            .links()
            .count(filter.as_deref())
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(LinkFeed {
            links: links.into_iter().map(Link::from).collect(),
            count,
            id: ID::from(feed_id(filter.as_deref(), take, skip)),
        })
    }

    /// Fetch a single link by id. Absent ids resolve to null, not an error.
    async fn fetch_single_link(&self, ctx: &Context<'_>, id: i64) -> Result<Option<Link>> {
        let db = ctx.data_unchecked::<Database>();

        let link = db
            .links()
            .get_by_id(id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(link.map(Link::from))
    }
}

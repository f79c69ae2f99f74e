//! Link mutations: post, update, delete
//!
//! All three require a caller identity. Ownership is not checked beyond
//! that: any authenticated user may update or delete any link.

use super::prelude::*;

#[derive(Default)]
pub struct LinkMutations;

#[Object]
impl LinkMutations {
    /// Post a new link owned by the caller
    async fn create_link(
        &self,
        ctx: &Context<'_>,
        description: String,
        url: String,
    ) -> Result<Link> {
        let user = ctx.auth_user().map_err(|e| e.extend())?;
        let db = ctx.data_unchecked::<Database>();

        let link = db
            .links()
            .create(NewLink {
                description,
                url,
                posted_by_id: Some(user.user_id),
            })
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        tracing::info!(link_id = link.id, user_id = user.user_id, "Link created");

        Ok(link.into())
    }

    /// Change a link's description and/or url. Omitted fields keep their
    /// stored value; supplying neither returns the link unchanged.
    async fn update_link(
        &self,
        ctx: &Context<'_>,
        id: i64,
        description: Option<String>,
        url: Option<String>,
    ) -> Result<Link> {
        let user = ctx.auth_user().map_err(|e| e.extend())?;
        let db = ctx.data_unchecked::<Database>();

        let link = db
            .links()
            .update(id, UpdateLink { description, url })
            .await
            .map_err(|e| ApiError::from(e).extend())?
            .ok_or_else(|| {
                tracing::warn!(link_id = id, "Update aimed at a missing link");
                ApiError::NotFound(id).extend()
            })?;

        tracing::info!(link_id = id, user_id = user.user_id, "Link updated");

        Ok(link.into())
    }

    /// Remove a link (and its votes), returning the removed entity
    async fn delete_link(&self, ctx: &Context<'_>, id: i64) -> Result<Link> {
        let user = ctx.auth_user().map_err(|e| e.extend())?;
        let db = ctx.data_unchecked::<Database>();

        let link = db
            .links()
            .delete(id)
            .await
            .map_err(|e| ApiError::from(e).extend())?
            .ok_or_else(|| {
                tracing::warn!(link_id = id, "Delete aimed at a missing link");
                ApiError::NotFound(id).extend()
            })?;

        tracing::info!(link_id = id, user_id = user.user_id, "Link deleted");

        Ok(link.into())
    }
}

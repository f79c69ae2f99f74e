//! Voting mutation

use super::prelude::*;

#[derive(Default)]
pub struct VoteMutations;

#[Object]
impl VoteMutations {
    /// Vote on a link as the caller.
    ///
    /// Fails with LINK_NOT_FOUND when the link does not exist and with
    /// DUPLICATE_VOTE when the caller already voted on it. The returned
    /// payload reloads both sides so it reflects the stored state.
    async fn vote(&self, ctx: &Context<'_>, link_id: i64) -> Result<Vote> {
        let caller = ctx.auth_user().map_err(|e| e.extend())?;
        let db = ctx.data_unchecked::<Database>();

        if db
            .links()
            .get_by_id(link_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?
            .is_none()
        {
            tracing::warn!(link_id, user_id = caller.user_id, "Vote aimed at a missing link");
            return Err(ApiError::LinkNotFound(link_id).extend());
        }

        db.links()
            .add_voter(link_id, caller.user_id)
            .await
            .map_err(|e| {
                let api_error = match e {
                    StoreError::UniqueViolation(_) => ApiError::DuplicateVote(link_id),
                    other => ApiError::from(other),
                };
                tracing::warn!(link_id, user_id = caller.user_id, error = %api_error, "Vote rejected");
                api_error.extend()
            })?;

        let link = db
            .links()
            .get_by_id(link_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?
            .ok_or_else(|| ApiError::LinkNotFound(link_id).extend())?;
        let user = db
            .users()
            .get_by_id(caller.user_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?
            .ok_or_else(|| {
                ApiError::Internal(format!("user {} missing after vote", caller.user_id)).extend()
            })?;

        tracing::info!(link_id, user_id = caller.user_id, "Vote recorded");

        Ok(Vote {
            link: link.into(),
            user: user.into(),
        })
    }
}

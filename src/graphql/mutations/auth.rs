//! GraphQL authentication mutations
//!
//! Signup and login. Neither requires authentication; both return a bearer
//! token for use in the Authorization header plus the account it names.

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Create a new account and log it in.
    ///
    /// Fails with DUPLICATE_EMAIL when the email is already registered.
    async fn signup(
        &self,
        ctx: &Context<'_>,
        email: String,
        name: String,
        password: String,
    ) -> Result<AuthPayload> {
        let auth_service = ctx.data_unchecked::<AuthService>();

        match auth_service.signup(email, name, password).await {
            Ok(session) => {
                tracing::info!(
                    user_id = session.user.id,
                    email = %session.user.email,
                    "User signed up"
                );
                Ok(AuthPayload {
                    token: session.token,
                    user: session.user.into(),
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Signup failed");
                Err(e.extend())
            }
        }
    }

    /// Exchange email and password for a bearer token.
    ///
    /// Unknown email and wrong password fail identically with
    /// INVALID_CREDENTIALS.
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthPayload> {
        let auth_service = ctx.data_unchecked::<AuthService>();

        match auth_service.login(&email, &password).await {
            Ok(session) => {
                tracing::info!(user_id = session.user.id, "User logged in");
                Ok(AuthPayload {
                    token: session.token,
                    user: session.user.into(),
                })
            }
            Err(e) => {
                tracing::warn!(email = %email, error = %e, "Login failed");
                Err(e.extend())
            }
        }
    }
}

//! Confirm Email Use Case

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::domain::repository::UserRepository;
use crate::domain::service::LinkPurpose;
use crate::error::{AuthError, AuthResult};

pub struct ConfirmEmailUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    ctx: Arc<AuthContext>,
}

impl<U> ConfirmEmailUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, ctx: Arc<AuthContext>) -> Self {
        Self { user_repo, ctx }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<()> {
        let now = self.ctx.clock.now();
        let email = self
            .ctx
            .link_tokens
            .verify(
                token,
                LinkPurpose::EmailConfirmation,
                self.ctx.config.link_max_age,
                now,
            )
            .map_err(|e| {
                tracing::debug!(error = %e, "Confirmation token rejected");
                AuthError::LinkTokenInvalid
            })?;

        // The address may have changed since the mail was sent
        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::LinkTokenInvalid)?;

        if !user.confirm_email(now) {
            return Err(AuthError::AlreadyConfirmed);
        }

        self.user_repo.update(&user).await?;

        tracing::info!(public_id = %user.public_id, "Email confirmed");
        Ok(())
    }
}

//! Password Reset Use Cases
//!
//! Two steps: request a reset link by email, then redeem it with a new
//! password.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::domain::repository::UserRepository;
use crate::domain::service::LinkPurpose;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Request
// ============================================================================

pub struct RequestPasswordResetUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    ctx: Arc<AuthContext>,
}

impl<U> RequestPasswordResetUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, ctx: Arc<AuthContext>) -> Self {
        Self { user_repo, ctx }
    }

    /// Mail a reset link to a confirmed account
    ///
    /// Unknown and unconfirmed addresses get the same answer.
    pub async fn execute(&self, email: &str) -> AuthResult<()> {
        let email = Email::new(email)?;

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Err(AuthError::ResetNotPermitted);
        };

        if !user.email_confirmed {
            tracing::debug!(public_id = %user.public_id, "Password reset requested for unconfirmed email");
            return Err(AuthError::ResetNotPermitted);
        }

        self.ctx.send_password_reset(&user);

        tracing::info!(public_id = %user.public_id, "Password reset link issued");
        Ok(())
    }
}

// ============================================================================
// Redeem
// ============================================================================

pub struct ResetPasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    ctx: Arc<AuthContext>,
}

impl<U> ResetPasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, ctx: Arc<AuthContext>) -> Self {
        Self { user_repo, ctx }
    }

    /// The token is checked before the password, so a bad token is always 401
    pub async fn execute(&self, token: &str, new_password: String) -> AuthResult<()> {
        let now = self.ctx.clock.now();
        let email = self
            .ctx
            .link_tokens
            .verify(
                token,
                LinkPurpose::PasswordReset,
                self.ctx.config.link_max_age,
                now,
            )
            .map_err(|e| {
                tracing::debug!(error = %e, "Reset token rejected");
                AuthError::LinkTokenInvalid
            })?;

        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::LinkTokenInvalid)?;

        let raw_password = RawPassword::new(new_password, &self.ctx.password_policy)?;
        let password = UserPassword::from_raw(&raw_password, self.ctx.config.pepper())?;

        user.set_password(password, now);
        self.user_repo.update(&user).await?;

        tracing::info!(public_id = %user.public_id, "Password reset");
        Ok(())
    }
}

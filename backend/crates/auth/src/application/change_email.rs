//! Change Email Use Case
//!
//! Moves an account to a new address. Confirmation starts over and a fresh
//! confirmation mail goes to the new address.

use std::sync::Arc;

use crate::application::check_session::AuthenticatedUser;
use crate::application::context::AuthContext;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

pub struct ChangeEmailUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    ctx: Arc<AuthContext>,
}

impl<U> ChangeEmailUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, ctx: Arc<AuthContext>) -> Self {
        Self { user_repo, ctx }
    }

    pub async fn execute(&self, caller: &AuthenticatedUser, new_email: &str) -> AuthResult<()> {
        let email = Email::new(new_email)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let mut user = self
            .user_repo
            .find_by_public_id(&caller.public_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        user.change_email(email, self.ctx.clock.now());

        self.user_repo.update(&user).await.map_err(|e| match e {
            AuthError::UserExists => AuthError::EmailTaken,
            other => other,
        })?;

        tracing::info!(public_id = %user.public_id, "Email changed");

        self.ctx.send_confirmation(&user);
        Ok(())
    }
}

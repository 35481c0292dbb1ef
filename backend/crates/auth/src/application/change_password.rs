//! Change Password Use Case

use std::sync::Arc;

use crate::application::check_session::AuthenticatedUser;
use crate::application::context::AuthContext;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    ctx: Arc<AuthContext>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, ctx: Arc<AuthContext>) -> Self {
        Self { user_repo, ctx }
    }

    pub async fn execute(&self, caller: &AuthenticatedUser, new_password: String) -> AuthResult<()> {
        // Valid signature for an account that no longer resolves
        let mut user = self
            .user_repo
            .find_by_public_id(&caller.public_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let raw_password = RawPassword::new(new_password, &self.ctx.password_policy)?;
        let password = UserPassword::from_raw(&raw_password, self.ctx.config.pepper())?;

        user.set_password(password, self.ctx.clock.now());
        self.user_repo.update(&user).await?;

        tracing::info!(public_id = %user.public_id, "Password changed");
        Ok(())
    }
}

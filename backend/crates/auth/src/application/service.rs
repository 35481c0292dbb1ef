//! Auth Service
//!
//! Facade over the account use cases. Each call builds its use case from the
//! shared repository and context, so the service itself holds no per-request
//! state and can be shared across tasks.

use std::sync::Arc;

use crate::application::change_email::ChangeEmailUseCase;
use crate::application::change_password::ChangePasswordUseCase;
use crate::application::check_session::{AuthenticatedUser, CheckSessionUseCase};
use crate::application::confirm_email::ConfirmEmailUseCase;
use crate::application::context::AuthContext;
use crate::application::password_reset::{RequestPasswordResetUseCase, ResetPasswordUseCase};
use crate::application::sign_in::{SignInInput, SignInOutput, SignInUseCase};
use crate::application::sign_out::SignOutUseCase;
use crate::application::sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
use crate::application::view_users::{GetUserUseCase, ListUsersUseCase};
use crate::domain::entity::user::User;
use crate::domain::repository::{RevocationRepository, UserRepository};
use crate::error::AuthResult;

pub struct AuthService<R>
where
    R: UserRepository + RevocationRepository,
{
    repo: Arc<R>,
    ctx: Arc<AuthContext>,
}

impl<R> Clone for AuthService<R>
where
    R: UserRepository + RevocationRepository,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            ctx: self.ctx.clone(),
        }
    }
}

impl<R> AuthService<R>
where
    R: UserRepository + RevocationRepository,
{
    pub fn new(repo: Arc<R>, ctx: Arc<AuthContext>) -> Self {
        Self { repo, ctx }
    }

    /// Session guard on a raw `Authorization` header value
    pub async fn check_session(&self, authorization: Option<&str>) -> AuthResult<AuthenticatedUser> {
        CheckSessionUseCase::new(self.repo.clone(), self.ctx.clone())
            .execute(authorization)
            .await
    }

    /// Session guard on a bare token
    pub async fn authenticate(&self, token: &str) -> AuthResult<AuthenticatedUser> {
        CheckSessionUseCase::new(self.repo.clone(), self.ctx.clone())
            .authenticate(token)
            .await
    }

    pub async fn register(
        &self,
        input: SignUpInput,
        caller: Option<&AuthenticatedUser>,
    ) -> AuthResult<SignUpOutput> {
        SignUpUseCase::new(self.repo.clone(), self.ctx.clone())
            .execute(input, caller)
            .await
    }

    pub async fn login(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        SignInUseCase::new(self.repo.clone(), self.ctx.clone())
            .execute(input)
            .await
    }

    pub async fn logout(&self, authorization: Option<&str>) -> AuthResult<()> {
        SignOutUseCase::new(self.repo.clone(), self.ctx.clone())
            .execute(authorization)
            .await
    }

    pub async fn confirm_email(&self, token: &str) -> AuthResult<()> {
        ConfirmEmailUseCase::new(self.repo.clone(), self.ctx.clone())
            .execute(token)
            .await
    }

    pub async fn request_password_reset(&self, email: &str) -> AuthResult<()> {
        RequestPasswordResetUseCase::new(self.repo.clone(), self.ctx.clone())
            .execute(email)
            .await
    }

    pub async fn reset_password(&self, token: &str, new_password: String) -> AuthResult<()> {
        ResetPasswordUseCase::new(self.repo.clone(), self.ctx.clone())
            .execute(token, new_password)
            .await
    }

    pub async fn change_password(
        &self,
        caller: &AuthenticatedUser,
        new_password: String,
    ) -> AuthResult<()> {
        ChangePasswordUseCase::new(self.repo.clone(), self.ctx.clone())
            .execute(caller, new_password)
            .await
    }

    pub async fn change_email(&self, caller: &AuthenticatedUser, new_email: &str) -> AuthResult<()> {
        ChangeEmailUseCase::new(self.repo.clone(), self.ctx.clone())
            .execute(caller, new_email)
            .await
    }

    pub async fn list_users(&self, caller: &AuthenticatedUser) -> AuthResult<Vec<User>> {
        ListUsersUseCase::new(self.repo.clone()).execute(caller).await
    }

    pub async fn get_user(&self, caller: &AuthenticatedUser, public_id: &str) -> AuthResult<User> {
        GetUserUseCase::new(self.repo.clone())
            .execute(caller, public_id)
            .await
    }
}

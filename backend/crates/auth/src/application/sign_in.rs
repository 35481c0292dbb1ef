//! Sign In Use Case
//!
//! Authenticates a user by email and password and issues a session token.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// Bearer token for subsequent requests
    pub session_token: String,
    pub public_id: String,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    ctx: Arc<AuthContext>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, ctx: Arc<AuthContext>) -> Self {
        Self { user_repo, ctx }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // Unparseable email cannot match any account
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let raw_password = RawPassword::for_verification(input.password);
        if !user.password.verify(&raw_password, self.ctx.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.email_confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        let session_token = self
            .ctx
            .session_tokens
            .issue(&user, self.ctx.clock.now())
            .map_err(|e| AuthError::Internal(format!("session token encoding: {e}")))?;

        tracing::info!(
            public_id = %user.public_id,
            role = %user.user_role,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            public_id: user.public_id.to_string(),
        })
    }
}

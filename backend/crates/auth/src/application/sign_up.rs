//! Sign Up Use Case
//!
//! Registers a new account, resolves the admin grant and sends the
//! confirmation mail.

use std::sync::Arc;

use crate::application::check_session::AuthenticatedUser;
use crate::application::context::AuthContext;
use crate::domain::entity::user::User;
use crate::domain::repository::{InsertOutcome, RoleGrant, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub user_name: String,
    pub password: String,
    /// Request the admin role
    pub admin: bool,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub public_id: String,
    pub role: UserRole,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    ctx: Arc<AuthContext>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, ctx: Arc<AuthContext>) -> Self {
        Self { user_repo, ctx }
    }

    /// `caller` is the session of whoever makes the request, if any
    pub async fn execute(
        &self,
        input: SignUpInput,
        caller: Option<&AuthenticatedUser>,
    ) -> AuthResult<SignUpOutput> {
        let email = Email::new(&input.email)?;
        let user_name = UserName::new(&input.user_name)?;

        // Advisory; the unique constraints have the final word
        if self.user_repo.find_by_email(&email).await?.is_some()
            || self.user_repo.find_by_user_name(&user_name).await?.is_some()
        {
            return Err(AuthError::UserExists);
        }

        let raw_password = RawPassword::new(input.password, &self.ctx.password_policy)?;
        let password = UserPassword::from_raw(&raw_password, self.ctx.config.pepper())?;

        let grant = match (input.admin, caller) {
            (false, _) => RoleGrant::Standard,
            (true, Some(c)) if c.is_admin() => RoleGrant::Admin,
            (true, _) => RoleGrant::AdminIfFirst,
        };

        let user = User::new(email, user_name, password, self.ctx.clock.now());

        let user = match self.user_repo.insert_with_grant(&user, grant).await? {
            InsertOutcome::Inserted(user) => user,
            InsertOutcome::AdminDenied => {
                return Err(match caller {
                    None => AuthError::AdminSessionRequired,
                    Some(_) => AuthError::AdminPrivilegeRequired,
                });
            }
        };

        tracing::info!(
            public_id = %user.public_id,
            role = %user.user_role,
            "User signed up"
        );

        self.ctx.send_confirmation(&user);

        Ok(SignUpOutput {
            public_id: user.public_id.to_string(),
            role: user.user_role,
        })
    }
}

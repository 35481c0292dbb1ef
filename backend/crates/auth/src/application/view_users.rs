//! User Listing Use Cases
//!
//! Admins see every account; standard users only see themselves.

use std::sync::Arc;

use crate::application::check_session::AuthenticatedUser;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::public_id::PublicId;
use crate::error::{AuthError, AuthResult};

pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, caller: &AuthenticatedUser) -> AuthResult<Vec<User>> {
        if caller.is_admin() {
            return self.user_repo.list().await;
        }

        let own = self
            .user_repo
            .find_by_public_id(&caller.public_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;
        Ok(vec![own])
    }
}

pub struct GetUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> GetUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, caller: &AuthenticatedUser, public_id: &str) -> AuthResult<User> {
        if !caller.is_admin() && caller.public_id.as_str() != public_id {
            return Err(AuthError::CannotViewOthers);
        }

        let public_id = PublicId::parse(public_id).ok_or(AuthError::UserNotFound)?;

        self.user_repo
            .find_by_public_id(&public_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

//! Sign Out Use Case
//!
//! Revokes the presented session token.

use std::sync::Arc;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::context::AuthContext;
use crate::domain::entity::blacklist_entry::BlacklistEntry;
use crate::domain::repository::RevocationRepository;
use crate::error::{AuthError, AuthResult};

/// Sign out use case
pub struct SignOutUseCase<R>
where
    R: RevocationRepository,
{
    revocation_repo: Arc<R>,
    guard: CheckSessionUseCase<R>,
    ctx: Arc<AuthContext>,
}

impl<R> SignOutUseCase<R>
where
    R: RevocationRepository,
{
    pub fn new(revocation_repo: Arc<R>, ctx: Arc<AuthContext>) -> Self {
        Self {
            guard: CheckSessionUseCase::new(revocation_repo.clone(), ctx.clone()),
            revocation_repo,
            ctx,
        }
    }

    /// Sign out given the raw `Authorization` header value
    pub async fn execute(&self, authorization: Option<&str>) -> AuthResult<()> {
        let session = self.guard.execute(authorization).await?;

        let entry = BlacklistEntry::new(session.token, self.ctx.clock.now());
        // A concurrent logout with the same token may have won the insert
        if !self.revocation_repo.revoke(&entry).await? {
            return Err(AuthError::SessionRevoked);
        }

        tracing::info!(public_id = %session.public_id, "User signed out");
        Ok(())
    }
}

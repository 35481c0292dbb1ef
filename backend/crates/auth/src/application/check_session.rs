//! Check Session Use Case
//!
//! The session guard: bearer parsing, token verification, revocation check.

use std::sync::Arc;

use platform::client::parse_bearer;

use crate::application::context::AuthContext;
use crate::domain::repository::RevocationRepository;
use crate::domain::service::SessionClaims;
use crate::domain::value_object::{public_id::PublicId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Caller identity established by the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub public_id: PublicId,
    pub role: UserRole,
    /// Raw session token, kept so logout can revoke exactly this token
    pub token: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Check session use case
pub struct CheckSessionUseCase<R>
where
    R: RevocationRepository,
{
    revocation_repo: Arc<R>,
    ctx: Arc<AuthContext>,
}

impl<R> CheckSessionUseCase<R>
where
    R: RevocationRepository,
{
    pub fn new(revocation_repo: Arc<R>, ctx: Arc<AuthContext>) -> Self {
        Self {
            revocation_repo,
            ctx,
        }
    }

    /// Guard a request given its raw `Authorization` header value
    pub async fn execute(&self, authorization: Option<&str>) -> AuthResult<AuthenticatedUser> {
        let header = authorization.ok_or(AuthError::MalformedAuthorization)?;
        let token = parse_bearer(header)?;
        self.authenticate(token).await
    }

    /// Verify a bare token, then consult the revocation store
    pub async fn authenticate(&self, token: &str) -> AuthResult<AuthenticatedUser> {
        let claims = self.verify(token)?;

        if self.revocation_repo.is_revoked(token).await? {
            return Err(AuthError::SessionRevoked);
        }

        let public_id = claims.public_id().ok_or(AuthError::SessionInvalid)?;

        Ok(AuthenticatedUser {
            public_id,
            role: claims.role,
            token: token.to_string(),
        })
    }

    /// Signature and expiry only
    pub fn verify(&self, token: &str) -> AuthResult<SessionClaims> {
        Ok(self.ctx.session_tokens.verify(token, self.ctx.clock.now())?)
    }
}

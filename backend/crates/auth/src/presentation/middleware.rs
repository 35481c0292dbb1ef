//! Auth Middleware
//!
//! Session guard for protected routes. On success the caller identity is
//! stored in request extensions as [`AuthenticatedUser`].

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use platform::client::extract_bearer;

use crate::application::AuthService;
use crate::domain::repository::{RevocationRepository, UserRepository};
use crate::error::AuthError;

/// Middleware that requires a valid, unrevoked session token
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_session<R>(
    State(service): State<AuthService<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    let token = extract_bearer(req.headers())?;
    let caller = service.authenticate(token).await?;

    tracing::debug!(public_id = %caller.public_id, "Session accepted");

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

//! Auth (Account Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, token codecs, repository traits
//! - `application/` - Use cases and the `AuthService` facade
//! - `infra/` - PostgreSQL and in-memory stores, mailers
//! - `presentation/` - HTTP handlers, DTOs, router, session middleware
//!
//! ## Features
//! - Registration with email confirmation links
//! - Login issuing signed bearer session tokens; logout revokes them
//! - Password reset links and password change
//! - Bootstrap admin: the first account is always an admin
//!
//! ## Security Model
//! - Passwords hashed with Argon2id after NFKC normalization
//! - Session and link tokens are HMAC-SHA256 signed with separate keys
//! - Confirmation and reset links are purpose-bound and expire after `link_max_age` (10 minutes by default)
//! - Revoked session tokens are rejected even while their signature is valid

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::{AuthConfig, AuthContext, AuthSecrets, AuthService};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAuthRepository, LogMailer, PgAuthRepository, RecordingMailer};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

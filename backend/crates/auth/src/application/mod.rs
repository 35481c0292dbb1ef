//! Application Layer
//!
//! Use cases and application services.

pub mod change_email;
pub mod change_password;
pub mod check_session;
pub mod config;
pub mod confirm_email;
pub mod context;
pub mod mail;
pub mod password_reset;
pub mod service;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod view_users;

// Re-exports
pub use check_session::{AuthenticatedUser, CheckSessionUseCase};
pub use config::{AuthConfig, AuthSecrets};
pub use context::AuthContext;
pub use mail::{MailError, MailMessage, MailPurpose, Mailer};
pub use service::AuthService;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};

//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::BearerError;
use platform::password::PasswordViolation;
use thiserror::Error;

use crate::domain::service::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    // ------------------------------------------------------------------
    // 400
    // ------------------------------------------------------------------
    /// Authorization header missing or not a Bearer credential
    #[error("Request malformed")]
    MalformedAuthorization,

    /// Body is not the expected JSON
    #[error("Request malformed")]
    MalformedBody,

    /// New password fails one or more policy rules
    #[error("Password does not meet the password policy")]
    PasswordPolicy(Vec<PasswordViolation>),

    /// Request field failed validation (email, user name, ...)
    #[error("{0}")]
    InvalidInput(String),

    // ------------------------------------------------------------------
    // 401
    // ------------------------------------------------------------------
    #[error("Email and password do not match")]
    InvalidCredentials,

    #[error("Email address has not been confirmed")]
    EmailNotConfirmed,

    #[error("JWT signature expired: log in again")]
    SessionExpired,

    #[error("JWT invalid: log in again")]
    SessionInvalid,

    #[error("JWT blacklisted: log in again")]
    SessionRevoked,

    /// Confirmation or reset link failed verification
    #[error("Link invalid or expired")]
    LinkTokenInvalid,

    /// Password reset refused (unknown or unconfirmed account)
    #[error("Password reset not permitted")]
    ResetNotPermitted,

    #[error("JWT token with admin privileges required to create admin")]
    AdminSessionRequired,

    #[error("User has insufficient privilege to create admin")]
    AdminPrivilegeRequired,

    #[error("Non-admin users can only view themselves")]
    CannotViewOthers,

    // ------------------------------------------------------------------
    // 404 / 409
    // ------------------------------------------------------------------
    #[error("User not found")]
    UserNotFound,

    #[error("User exists: log in")]
    UserExists,

    #[error("Account already confirmed")]
    AlreadyConfirmed,

    #[error("Email address already in use")]
    EmailTaken,

    // ------------------------------------------------------------------
    // 500
    // ------------------------------------------------------------------
    /// Persistence failure (detail is logged, never returned)
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        use AuthError::*;
        match self {
            MalformedAuthorization | MalformedBody | PasswordPolicy(_) | InvalidInput(_) => {
                ErrorKind::BadRequest
            }
            InvalidCredentials
            | EmailNotConfirmed
            | SessionExpired
            | SessionInvalid
            | SessionRevoked
            | LinkTokenInvalid
            | ResetNotPermitted
            | AdminSessionRequired
            | AdminPrivilegeRequired
            | CannotViewOthers => ErrorKind::Unauthorized,
            UserNotFound => ErrorKind::NotFound,
            UserExists | AlreadyConfirmed | EmailTaken => ErrorKind::Conflict,
            Storage(_) | Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::PasswordPolicy(violations) => {
                AppError::new(self.kind(), self.to_string())
                    .with_details(violations.iter().map(ToString::to_string).collect())
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Storage(detail) => {
                tracing::error!(detail = %detail, "Auth storage error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::SessionInvalid | AuthError::SessionRevoked => {
                tracing::warn!(error = %self, "Rejected session token");
            }
            AuthError::LinkTokenInvalid => {
                tracing::warn!("Rejected link token");
            }
            AuthError::AdminSessionRequired | AuthError::AdminPrivilegeRequired => {
                tracing::warn!(error = %self, "Admin creation refused");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::InvalidInput(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            return AuthError::UserExists;
        }
        AuthError::Storage(err.to_string())
    }
}

impl From<BearerError> for AuthError {
    fn from(_: BearerError) -> Self {
        AuthError::MalformedAuthorization
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        AuthError::MalformedBody
    }
}

impl From<TokenError> for AuthError {
    /// Session token failures; link tokens map to [`AuthError::LinkTokenInvalid`] at the call site.
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::SessionExpired,
            TokenError::Malformed | TokenError::BadSignature => AuthError::SessionInvalid,
        }
    }
}

/// Check whether a sqlx error is a unique-constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::MalformedAuthorization.status_code(), 400);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::SessionRevoked.status_code(), 401);
        assert_eq!(AuthError::UserNotFound.status_code(), 404);
        assert_eq!(AuthError::AlreadyConfirmed.status_code(), 409);
        assert_eq!(AuthError::Storage("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_password_policy_carries_every_violation() {
        let err = AuthError::PasswordPolicy(vec![
            PasswordViolation::MissingDigit,
            PasswordViolation::TooShort { min: 12 },
        ]);
        let app = err.to_app_error();
        assert_eq!(app.kind(), ErrorKind::BadRequest);
        assert_eq!(
            app.details().unwrap(),
            &[
                "Password needs at least one number.".to_string(),
                "Password needs to be at least 12 characters in length.".to_string(),
            ]
        );
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(AuthError::from(TokenError::Expired), AuthError::SessionExpired));
        assert!(matches!(AuthError::from(TokenError::BadSignature), AuthError::SessionInvalid));
        assert!(matches!(AuthError::from(TokenError::Malformed), AuthError::SessionInvalid));
    }

    #[test]
    fn test_bad_request_app_error_becomes_invalid_input() {
        let err = AuthError::from(AppError::bad_request("Invalid email format"));
        assert!(matches!(err, AuthError::InvalidInput(ref m) if m == "Invalid email format"));
    }

    #[test]
    fn test_non_unique_sqlx_error_is_storage() {
        let err = AuthError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AuthError::Storage(_)));
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
    }
}

//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::crypto::{random_bytes, to_base64url};

/// Session lifetime (1 day)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 3600);

/// Confirmation/reset link lifetime (10 minutes)
pub const DEFAULT_LINK_MAX_AGE: Duration = Duration::from_secs(600);

/// Signing secrets, all required at startup
#[derive(Clone)]
pub struct AuthSecrets {
    /// Primary secret for link tokens
    pub secret_key: Vec<u8>,
    /// Session token signing secret
    pub session_secret: Vec<u8>,
    pub confirmation_salt: String,
    pub reset_salt: String,
}

impl AuthSecrets {
    /// Random secrets (for development and tests)
    pub fn random() -> Self {
        Self {
            secret_key: random_bytes(32),
            session_secret: random_bytes(32),
            confirmation_salt: to_base64url(&random_bytes(16)),
            reset_salt: to_base64url(&random_bytes(16)),
        }
    }
}

impl fmt::Debug for AuthSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSecrets")
            .field("secret_key", &"[REDACTED]")
            .field("session_secret", &"[REDACTED]")
            .field("confirmation_salt", &"[REDACTED]")
            .field("reset_salt", &"[REDACTED]")
            .finish()
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secrets: AuthSecrets,
    /// Session token lifetime
    pub session_ttl: Duration,
    /// Maximum age of confirmation/reset link tokens
    pub link_max_age: Duration,
    /// Origin used to build links in mails, e.g. `https://accounts.example.com`
    pub public_base_url: String,
    /// From address for outgoing mail
    pub mail_sender: String,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    pub fn new(secrets: AuthSecrets, public_base_url: impl Into<String>) -> Self {
        Self {
            secrets,
            session_ttl: DEFAULT_SESSION_TTL,
            link_max_age: DEFAULT_LINK_MAX_AGE,
            public_base_url: public_base_url.into(),
            mail_sender: "no-reply@localhost".to_string(),
            password_pepper: None,
        }
    }

    /// Create config for development (random secrets, local base URL)
    pub fn development() -> Self {
        Self::new(AuthSecrets::random(), "http://localhost:31113")
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Session TTL as a chrono duration
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::days(1))
    }

    /// Absolute link for a path such as `/auth/confirm/<token>`
    pub fn link(&self, path: &str) -> String {
        format!("{}{}", self.public_base_url.trim_end_matches('/'), path)
    }
}

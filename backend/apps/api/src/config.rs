//! Server configuration from the environment

use std::net::SocketAddr;

use anyhow::{Context, anyhow};
use auth::{AuthConfig, AuthSecrets};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ApiConfig {
    /// Read `.env` (if any), then the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("{key} must be set in environment"))
        };

        let database_url = required("DATABASE_URL")?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR is not a socket address")?;

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let secrets = AuthSecrets {
            secret_key: required("SECRET_KEY")?.into_bytes(),
            session_secret: required("JWT_SECRET_KEY")?.into_bytes(),
            confirmation_salt: required("EMAIL_CONFIRMATION_SALT")?,
            reset_salt: required("PASSWORD_RESET_SALT")?,
        };

        let scheme = lookup("PREFERRED_URL_SCHEME").unwrap_or_else(|| "http".to_string());
        let server_name = lookup("SERVER_NAME").unwrap_or_else(|| bind_addr.to_string());

        let mut auth = AuthConfig::new(secrets, format!("{scheme}://{server_name}"));
        if let Some(sender) = lookup("ADMIN_EMAIL") {
            auth.mail_sender = sender;
        }
        auth.password_pepper = lookup("PASSWORD_PEPPER")
            .filter(|v| !v.is_empty())
            .map(String::into_bytes);

        Ok(Self {
            database_url,
            bind_addr,
            frontend_origins,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> HashMap<String, String> {
        env(&[
            ("DATABASE_URL", "postgres://localhost/accounts"),
            ("SECRET_KEY", "s3cret"),
            ("JWT_SECRET_KEY", "jwt-s3cret"),
            ("EMAIL_CONFIRMATION_SALT", "confirm-salt"),
            ("PASSWORD_RESET_SALT", "reset-salt"),
        ])
    }

    #[test]
    fn test_defaults() {
        let vars = base();
        let config = ApiConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.bind_addr.port(), 31113);
        assert_eq!(config.frontend_origins.len(), 2);
        assert_eq!(config.auth.secrets.secret_key, b"s3cret");
        assert_eq!(config.auth.public_base_url, "http://0.0.0.0:31113");
        assert!(config.auth.pepper().is_none());
    }

    #[test]
    fn test_overrides() {
        let mut vars = base();
        vars.extend(env(&[
            ("SERVER_NAME", "accounts.example.com"),
            ("PREFERRED_URL_SCHEME", "https"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("PASSWORD_PEPPER", "pepper"),
        ]));
        let config = ApiConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.auth.public_base_url, "https://accounts.example.com");
        assert_eq!(config.auth.mail_sender, "admin@example.com");
        assert_eq!(config.auth.pepper(), Some(&b"pepper"[..]));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let mut vars = base();
        vars.remove("JWT_SECRET_KEY");
        let err = ApiConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET_KEY"));
    }
}

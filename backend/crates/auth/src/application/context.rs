//! Shared collaborators for the use cases
//!
//! Built once at startup and shared through an `Arc`. Everything in here is
//! `Send + Sync` and immutable.

use std::sync::Arc;

use platform::clock::{Clock, SystemClock};
use platform::password::PasswordPolicy;

use crate::application::config::AuthConfig;
use crate::application::mail::{MailMessage, Mailer, send_logged};
use crate::domain::entity::user::User;
use crate::domain::service::{LinkPurpose, LinkTokenCodec, SessionTokenCodec};
use crate::infra::mail::LogMailer;

pub struct AuthContext {
    pub config: Arc<AuthConfig>,
    pub clock: Arc<dyn Clock>,
    pub mailer: Arc<dyn Mailer>,
    pub link_tokens: LinkTokenCodec,
    pub session_tokens: SessionTokenCodec,
    pub password_policy: PasswordPolicy,
}

impl AuthContext {
    pub fn new(config: AuthConfig, clock: Arc<dyn Clock>, mailer: Arc<dyn Mailer>) -> Self {
        let link_tokens = LinkTokenCodec::new(
            &config.secrets.secret_key,
            &config.secrets.confirmation_salt,
            &config.secrets.reset_salt,
        );
        let session_tokens = SessionTokenCodec::new(
            config.secrets.session_secret.clone(),
            config.session_ttl_chrono(),
        );

        Self {
            config: Arc::new(config),
            clock,
            mailer,
            link_tokens,
            session_tokens,
            password_policy: PasswordPolicy::default(),
        }
    }

    /// System clock and logging mailer
    pub fn with_defaults(config: AuthConfig) -> Self {
        Self::new(config, Arc::new(SystemClock), Arc::new(LogMailer))
    }

    /// Issue a confirmation token for the user's current email and mail it
    pub(crate) fn send_confirmation(&self, user: &User) {
        let token = self.link_tokens.issue(
            &user.email,
            LinkPurpose::EmailConfirmation,
            self.clock.now(),
        );
        let link = self.config.link(&format!("/auth/confirm/{token}"));
        let message = MailMessage::confirmation(
            &self.config.mail_sender,
            user.email.as_str(),
            link,
            self.config.link_max_age,
        );
        send_logged(self.mailer.as_ref(), &message);
    }

    /// Issue a reset token and mail it
    pub(crate) fn send_password_reset(&self, user: &User) {
        let token = self
            .link_tokens
            .issue(&user.email, LinkPurpose::PasswordReset, self.clock.now());
        let link = self.config.link(&format!("/auth/reset/{token}"));
        let message = MailMessage::password_reset(
            &self.config.mail_sender,
            user.email.as_str(),
            link,
            self.config.link_max_age,
        );
        send_logged(self.mailer.as_ref(), &message);
    }
}

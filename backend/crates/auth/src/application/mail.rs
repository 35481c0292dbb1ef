//! Outgoing mail port
//!
//! Delivery is someone else's job: the auth flows only build a
//! [`MailMessage`] and hand it to a [`Mailer`]. Send failures are logged and
//! never undo the state change that triggered the mail.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Kind of account mail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MailPurpose {
    EmailConfirmation,
    PasswordReset,
}

impl fmt::Display for MailPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MailPurpose::EmailConfirmation => "email_confirmation",
            MailPurpose::PasswordReset => "password_reset",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub purpose: MailPurpose,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    /// Absolute URL carrying the link token
    pub link: String,
    pub body: String,
}

impl MailMessage {
    pub fn confirmation(sender: &str, recipient: &str, link: String, valid_for: Duration) -> Self {
        Self {
            purpose: MailPurpose::EmailConfirmation,
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            subject: "Please confirm your email".to_string(),
            body: format!(
                "Welcome! Confirm your email address by opening the link below:\n\n{link}\n\n\
                 The link expires in {}.",
                describe_validity(valid_for)
            ),
            link,
        }
    }

    pub fn password_reset(
        sender: &str,
        recipient: &str,
        link: String,
        valid_for: Duration,
    ) -> Self {
        Self {
            purpose: MailPurpose::PasswordReset,
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            subject: "Password reset requested".to_string(),
            body: format!(
                "Someone asked to reset the password for this account. If it was you, \
                 open the link below within {}:\n\n{link}\n\nIf it was not you, ignore this mail.",
                describe_validity(valid_for)
            ),
            link,
        }
    }

    /// Token part of the link (last path segment)
    pub fn token(&self) -> &str {
        self.link.rsplit('/').next().unwrap_or_default()
    }
}

/// "10 minutes", "1 minute", "90 seconds"
fn describe_validity(valid_for: Duration) -> String {
    let secs = valid_for.as_secs();
    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };
    if secs >= 60 && secs % 60 == 0 {
        plural(secs / 60, "minute")
    } else {
        plural(secs, "second")
    }
}

#[derive(Debug, Error)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

/// Mail delivery abstraction
pub trait Mailer: Send + Sync + 'static {
    fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Send and log; a failed delivery is reported at `warn` and swallowed
pub(crate) fn send_logged(mailer: &dyn Mailer, message: &MailMessage) {
    match mailer.send(message) {
        Ok(()) => tracing::debug!(purpose = %message.purpose, "Mail handed to mailer"),
        Err(e) => tracing::warn!(purpose = %message.purpose, error = %e, "Mail delivery failed"),
    }
}

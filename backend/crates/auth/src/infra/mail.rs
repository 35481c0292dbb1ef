//! Mailer implementations

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::mail::{MailError, MailMessage, MailPurpose, Mailer};

/// Writes mails to the log instead of delivering them
///
/// The link is left out: it carries a live token.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(
            purpose = %message.purpose,
            sender = %message.sender,
            recipient = %message.recipient,
            subject = %message.subject,
            "Mail (log only)"
        );
        Ok(())
    }
}

/// Keeps every message in memory
///
/// Tests read link tokens back from here. Clones share the same inbox.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    messages: Arc<Mutex<Vec<MailMessage>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    fn inbox(&self) -> MutexGuard<'_, Vec<MailMessage>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// When set, `send` records nothing and reports a failure
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<MailMessage> {
        self.inbox().clone()
    }

    /// Most recent message of `purpose` sent to `recipient`
    pub fn last_for(&self, recipient: &str, purpose: MailPurpose) -> Option<MailMessage> {
        self.inbox()
            .iter()
            .rev()
            .find(|m| m.recipient == recipient && m.purpose == purpose)
            .cloned()
    }

    pub fn clear(&self) {
        self.inbox().clear();
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError("recording mailer set to fail".to_string()));
        }
        self.inbox().push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn msg(recipient: &str, link: &str) -> MailMessage {
        MailMessage::confirmation(
            "no-reply@example.com",
            recipient,
            link.to_string(),
            Duration::from_secs(600),
        )
    }

    #[test]
    fn test_last_for_picks_newest() {
        let mailer = RecordingMailer::new();
        mailer.send(&msg("a@example.com", "https://x/auth/confirm/one")).unwrap();
        mailer.send(&msg("b@example.com", "https://x/auth/confirm/two")).unwrap();
        mailer.send(&msg("a@example.com", "https://x/auth/confirm/three")).unwrap();

        let last = mailer
            .last_for("a@example.com", MailPurpose::EmailConfirmation)
            .unwrap();
        assert_eq!(last.token(), "three");
        assert!(mailer.last_for("a@example.com", MailPurpose::PasswordReset).is_none());
        assert_eq!(mailer.messages().len(), 3);
    }

    #[test]
    fn test_failing_mode() {
        let mailer = RecordingMailer::new();
        mailer.set_failing(true);
        assert!(mailer.send(&msg("a@example.com", "https://x/auth/confirm/one")).is_err());
        assert!(mailer.messages().is_empty());

        mailer.set_failing(false);
        mailer.send(&msg("a@example.com", "https://x/auth/confirm/one")).unwrap();
        mailer.clear();
        assert!(mailer.messages().is_empty());
    }

    #[test]
    fn test_log_mailer_never_fails() {
        assert!(LogMailer.send(&msg("a@example.com", "https://x/auth/confirm/one")).is_ok());
    }
}

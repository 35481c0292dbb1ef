//! Signed Link Token Codec
//!
//! Time-limited tokens embedded in confirmation and password-reset links.
//! Not persisted: a token is fully determined by email, purpose, issue time
//! and the primary secret.
//!
//! Wire form: `b64url(email) "." b64url(issued_at_be) "." b64url(signature)`
//!
//! The signing key is `HMAC(secret, salt || "signer")` with a per-purpose
//! salt, so a confirmation token never verifies as a reset token.

use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};

use super::TokenError;
use crate::domain::value_object::email::Email;

const KEY_DERIVATION_SUFFIX: &[u8] = b"signer";

/// What a link token authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkPurpose {
    EmailConfirmation,
    PasswordReset,
}

impl LinkPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkPurpose::EmailConfirmation => "email_confirmation",
            LinkPurpose::PasswordReset => "password_reset",
        }
    }
}

impl std::fmt::Display for LinkPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issues and verifies signed link tokens
#[derive(Clone)]
pub struct LinkTokenCodec {
    confirmation_key: [u8; 32],
    reset_key: [u8; 32],
}

impl LinkTokenCodec {
    pub fn new(secret: &[u8], confirmation_salt: &str, reset_salt: &str) -> Self {
        Self {
            confirmation_key: derive_key(secret, confirmation_salt),
            reset_key: derive_key(secret, reset_salt),
        }
    }

    fn key(&self, purpose: LinkPurpose) -> &[u8; 32] {
        match purpose {
            LinkPurpose::EmailConfirmation => &self.confirmation_key,
            LinkPurpose::PasswordReset => &self.reset_key,
        }
    }

    /// Issue a token for `email`, stamped with `now`
    pub fn issue(&self, email: &Email, purpose: LinkPurpose, now: DateTime<Utc>) -> String {
        let payload = format!(
            "{}.{}",
            to_base64url(email.as_str().as_bytes()),
            to_base64url(&now.timestamp().to_be_bytes())
        );
        let signature = hmac_sha256(self.key(purpose), &[payload.as_bytes()]);
        format!("{payload}.{}", to_base64url(&signature))
    }

    /// Verify a token and return the embedded email
    ///
    /// A token exactly `max_age` old is still valid.
    pub fn verify(
        &self,
        token: &str,
        purpose: LinkPurpose,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<Email, TokenError> {
        let (payload, signature_b64) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
        let (email_b64, issued_b64) = payload.split_once('.').ok_or(TokenError::Malformed)?;
        if issued_b64.contains('.') {
            return Err(TokenError::Malformed);
        }

        let signature = from_base64url(signature_b64).map_err(|_| TokenError::Malformed)?;
        if !verify_hmac_sha256(self.key(purpose), &[payload.as_bytes()], &signature) {
            return Err(TokenError::BadSignature);
        }

        let issued_bytes: [u8; 8] = from_base64url(issued_b64)
            .map_err(|_| TokenError::Malformed)?
            .try_into()
            .map_err(|_| TokenError::Malformed)?;
        let issued_at = i64::from_be_bytes(issued_bytes);

        let email_bytes = from_base64url(email_b64).map_err(|_| TokenError::Malformed)?;
        let email = String::from_utf8(email_bytes).map_err(|_| TokenError::Malformed)?;

        let age = now.timestamp() - issued_at;
        if age < 0 || age.unsigned_abs() > max_age.as_secs() {
            return Err(TokenError::Expired);
        }

        Ok(Email::from_db(email))
    }
}

fn derive_key(secret: &[u8], salt: &str) -> [u8; 32] {
    hmac_sha256(secret, &[salt.as_bytes(), KEY_DERIVATION_SUFFIX])
}

impl std::fmt::Debug for LinkTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkTokenCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const MAX_AGE: Duration = Duration::from_secs(600);

    fn codec() -> LinkTokenCodec {
        LinkTokenCodec::new(b"primary-secret", "confirm-salt", "reset-salt")
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn email() -> Email {
        Email::new("ann@example.com").unwrap()
    }

    #[test]
    fn test_round_trip_within_max_age() {
        let token = codec().issue(&email(), LinkPurpose::EmailConfirmation, t0());
        let later = t0() + chrono::Duration::seconds(600);
        assert_eq!(
            codec().verify(&token, LinkPurpose::EmailConfirmation, MAX_AGE, later),
            Ok(email())
        );
    }

    #[test]
    fn test_expired_after_max_age() {
        let token = codec().issue(&email(), LinkPurpose::PasswordReset, t0());
        let later = t0() + chrono::Duration::seconds(601);
        assert_eq!(
            codec().verify(&token, LinkPurpose::PasswordReset, MAX_AGE, later),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_future_issue_time_is_rejected() {
        let token = codec().issue(&email(), LinkPurpose::PasswordReset, t0());
        let earlier = t0() - chrono::Duration::seconds(5);
        assert_eq!(
            codec().verify(&token, LinkPurpose::PasswordReset, MAX_AGE, earlier),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_purpose_is_part_of_identity() {
        let confirm = codec().issue(&email(), LinkPurpose::EmailConfirmation, t0());
        let reset = codec().issue(&email(), LinkPurpose::PasswordReset, t0());
        assert_ne!(confirm, reset);
        assert_eq!(
            codec().verify(&confirm, LinkPurpose::PasswordReset, MAX_AGE, t0()),
            Err(TokenError::BadSignature)
        );
        assert_eq!(
            codec().verify(&reset, LinkPurpose::EmailConfirmation, MAX_AGE, t0()),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_other_secret_rejects() {
        let token = codec().issue(&email(), LinkPurpose::EmailConfirmation, t0());
        let other = LinkTokenCodec::new(b"another-secret", "confirm-salt", "reset-salt");
        assert_eq!(
            other.verify(&token, LinkPurpose::EmailConfirmation, MAX_AGE, t0()),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_tampered_email_rejects() {
        let token = codec().issue(&email(), LinkPurpose::EmailConfirmation, t0());
        let (_, rest) = token.split_once('.').unwrap();
        let forged = format!("{}.{rest}", to_base64url(b"eve@example.com"));
        assert_eq!(
            codec().verify(&forged, LinkPurpose::EmailConfirmation, MAX_AGE, t0()),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a.b.!!!"] {
            assert_eq!(
                codec().verify(token, LinkPurpose::EmailConfirmation, MAX_AGE, t0()),
                Err(TokenError::Malformed),
                "{token}"
            );
        }
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = codec().issue(&email(), LinkPurpose::EmailConfirmation, t0());
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));
    }
}

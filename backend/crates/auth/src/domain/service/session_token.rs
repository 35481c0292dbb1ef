//! Session Token Codec
//!
//! HS256 JSON Web Tokens via `jsonwebtoken`. Verification checks signature
//! and expiry only; revocation is the session guard's job.
//!
//! Expiry is compared against the injected clock rather than the system
//! time, so `exp` is required by [`Validation`] but checked here.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TokenError;
use crate::domain::entity::user::User;
use crate::domain::value_object::{public_id::PublicId, user_role::UserRole};

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Public id of the user
    pub sub: String,
    pub role: UserRole,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
    /// Unique per token, so two logins in the same second revoke independently
    pub jti: Uuid,
}

impl SessionClaims {
    pub fn public_id(&self) -> Option<PublicId> {
        PublicId::parse(&self.sub)
    }
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct SessionTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionTokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        let secret = secret.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            validation,
            ttl,
        }
    }

    pub fn issue(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = SessionClaims {
            sub: user.public_id.to_string(),
            role: user.user_role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Verify signature and expiry
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?
            .claims;

        if now.timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        email::Email,
        user_name::UserName,
        user_password::{RawPassword, UserPassword},
    };
    use chrono::TimeZone;
    use platform::crypto::{from_base64url, to_base64url};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn codec() -> SessionTokenCodec {
        SessionTokenCodec::new(b"session-secret".to_vec(), Duration::days(1))
    }

    fn admin() -> User {
        let raw = RawPassword::for_verification("pw".to_string());
        let mut user = User::new(
            Email::new("root@example.com").unwrap(),
            UserName::new("root").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
            t0(),
        );
        user.user_role = UserRole::Admin;
        user
    }

    #[test]
    fn test_verify_returns_subject_and_role() {
        let user = admin();
        let token = codec().issue(&user, t0()).unwrap();
        let claims = codec().verify(&token, t0() + Duration::hours(23)).unwrap();
        assert_eq!(claims.public_id(), Some(user.public_id));
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_valid_until_exp_inclusive() {
        let token = codec().issue(&admin(), t0()).unwrap();
        assert!(codec().verify(&token, t0() + Duration::days(1)).is_ok());
    }

    #[test]
    fn test_expired_after_ttl() {
        let token = codec().issue(&admin(), t0()).unwrap();
        assert_eq!(
            codec().verify(&token, t0() + Duration::days(1) + Duration::seconds(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_same_second_tokens_differ() {
        let user = admin();
        assert_ne!(
            codec().issue(&user, t0()).unwrap(),
            codec().issue(&user, t0()).unwrap()
        );
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let token = codec().issue(&admin(), t0()).unwrap();
        let other = SessionTokenCodec::new(b"other".to_vec(), Duration::days(1));
        assert_eq!(other.verify(&token, t0()), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_role_escalation_is_detected() {
        let mut user = admin();
        user.user_role = UserRole::Standard;
        let token = codec().issue(&user, t0()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        let json = String::from_utf8(from_base64url(parts[1]).unwrap()).unwrap();
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            to_base64url(json.replace("\"standard\"", "\"admin\"").as_bytes()),
            parts[2]
        );
        assert_eq!(codec().verify(&forged, t0()), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed() {
        for token in ["", "nodot", "a.b", "a.b.c", "a.###.c"] {
            assert_eq!(codec().verify(token, t0()), Err(TokenError::Malformed), "{token}");
        }
    }

    #[test]
    fn test_signed_token_without_claims_is_malformed() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "someone" }),
            &EncodingKey::from_secret(b"session-secret"),
        )
        .unwrap();
        assert_eq!(codec().verify(&token, t0()), Err(TokenError::Malformed));
    }
}

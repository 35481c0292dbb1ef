//! Domain Services
//!
//! Stateless token codecs. Each codec owns its secrets; nothing here reads
//! global state or touches storage.

pub mod link_token;
pub mod session_token;

pub use link_token::{LinkPurpose, LinkTokenCodec};
pub use session_token::{SessionClaims, SessionTokenCodec};

use thiserror::Error;

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Wrong shape or undecodable part
    #[error("token is malformed")]
    Malformed,

    /// Signature does not match (tampered, wrong secret or wrong purpose)
    #[error("token signature mismatch")]
    BadSignature,

    /// Older than allowed, or issued in the future
    #[error("token expired")]
    Expired,
}

//! PublicId Value Object
//!
//! Externally visible user identifier, used as the session subject and in
//! `/users/{public_id}`. Wraps a 21-character Nanoid; the internal UUID is
//! never exposed.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::public_id::PublicId;
//!
//! let public_id = PublicId::new();
//! assert_eq!(public_id.as_str().len(), 21);
//! assert_eq!(PublicId::parse(public_id.as_str()), Some(public_id));
//! ```
use std::str::FromStr;

use nid::Nanoid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicId(Nanoid);

impl PublicId {
    #[inline]
    pub fn new() -> Self {
        Self(Nanoid::new())
    }

    /// Parse an identifier from a path segment or token subject
    ///
    /// Anything that is not a well-formed Nanoid cannot name a user.
    #[inline]
    pub fn parse(s: &str) -> Option<Self> {
        Nanoid::from_str(s).ok().map(Self)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for PublicId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PublicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_parse() {
        let id_str = "0123456789abcdefghi01";
        let public_id = PublicId::parse(id_str).unwrap();
        assert_eq!(public_id.as_str(), id_str);
    }

    #[test]
    fn test_public_id_parse_rejects_garbage() {
        assert!(PublicId::parse("invalid_id!@#").is_none());
        assert!(PublicId::parse("").is_none());
    }

    #[test]
    fn test_public_ids_are_unique() {
        assert_ne!(PublicId::new(), PublicId::new());
    }
}

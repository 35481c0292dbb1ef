//! Blacklist Entry Entity
//!
//! A revoked session token. Entries are append-only and never expire.

use chrono::{DateTime, Utc};
use kernel::id::BlacklistEntryId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistEntry {
    pub entry_id: BlacklistEntryId,
    /// Full session token string, unique in storage
    pub token: String,
    pub blacklisted_at: DateTime<Utc>,
}

impl BlacklistEntry {
    pub fn new(token: impl Into<String>, blacklisted_at: DateTime<Utc>) -> Self {
        Self {
            entry_id: BlacklistEntryId::new(),
            token: token.into(),
            blacklisted_at,
        }
    }
}

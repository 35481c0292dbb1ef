//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use crate::domain::entity::{blacklist_entry::BlacklistEntry, user::User};
use crate::domain::value_object::{
    email::Email, public_id::PublicId, user_name::UserName, user_role::UserRole,
};
use crate::error::AuthResult;

/// Role requested for a new account
///
/// Whatever the grant, the first account in an empty store becomes admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGrant {
    /// Standard account (admin if first)
    Standard,
    /// Admin requested without an admin session: honored only if first,
    /// otherwise the insert is refused
    AdminIfFirst,
    /// Admin, vouched for by an admin session
    Admin,
}

impl RoleGrant {
    /// Final role given whether the store was empty at insert time
    pub fn resolve(self, store_empty: bool) -> Option<UserRole> {
        match (self, store_empty) {
            (_, true) | (RoleGrant::Admin, false) => Some(UserRole::Admin),
            (RoleGrant::Standard, false) => Some(UserRole::Standard),
            (RoleGrant::AdminIfFirst, false) => None,
        }
    }
}

/// Result of an insert with role resolution
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// Stored; carries the user with its final role
    Inserted(User),
    /// `AdminIfFirst` requested but the store is not empty
    AdminDenied,
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Lookup by canonical user name
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    async fn find_by_public_id(&self, public_id: &PublicId) -> AuthResult<Option<User>>;

    /// All users, oldest first
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Insert a new user, resolving the role atomically with the insert
    ///
    /// The emptiness check for [`RoleGrant::AdminIfFirst`] and the insert must
    /// not interleave with another registration. Uniqueness violations on
    /// email or user name surface as [`crate::error::AuthError::UserExists`].
    async fn insert_with_grant(&self, user: &User, grant: RoleGrant) -> AuthResult<InsertOutcome>;

    /// Persist every mutable field of an existing user in one write
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Revocation store (session token blacklist)
#[trait_variant::make(RevocationRepository: Send)]
pub trait LocalRevocationRepository {
    /// Record a revoked token
    ///
    /// Returns `false` if the token was already present.
    async fn revoke(&self, entry: &BlacklistEntry) -> AuthResult<bool>;

    async fn is_revoked(&self, token: &str) -> AuthResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_account_is_always_admin() {
        for grant in [RoleGrant::Standard, RoleGrant::AdminIfFirst, RoleGrant::Admin] {
            assert_eq!(grant.resolve(true), Some(UserRole::Admin));
        }
    }

    #[test]
    fn test_later_accounts() {
        assert_eq!(RoleGrant::Standard.resolve(false), Some(UserRole::Standard));
        assert_eq!(RoleGrant::Admin.resolve(false), Some(UserRole::Admin));
        assert_eq!(RoleGrant::AdminIfFirst.resolve(false), None);
    }
}

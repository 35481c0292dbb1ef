//! In-memory Repository
//!
//! Development and test store. One mutex guards every table, so the
//! bootstrap check and the insert cannot interleave.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::entity::{blacklist_entry::BlacklistEntry, user::User};
use crate::domain::repository::{InsertOutcome, RevocationRepository, RoleGrant, UserRepository};
use crate::domain::value_object::{email::Email, public_id::PublicId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    /// Insertion order is registration order
    users: Vec<User>,
    blacklist: HashMap<String, BlacklistEntry>,
}

/// In-memory auth repository
#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn revoked_count(&self) -> usize {
        self.lock().blacklist.len()
    }
}

impl State {
    /// Email or canonical name held by anyone other than `except`
    fn conflicts(&self, user: &User, except: Option<&User>) -> bool {
        self.users.iter().any(|u| {
            if except.is_some_and(|e| e.user_id == u.user_id) {
                return false;
            }
            u.email == user.email || u.user_name.canonical() == user.user_name.canonical()
        })
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for InMemoryAuthRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| &u.email == email).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.user_name.canonical() == user_name.canonical())
            .cloned())
    }

    async fn find_by_public_id(&self, public_id: &PublicId) -> AuthResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| &u.public_id == public_id)
            .cloned())
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        Ok(self.lock().users.clone())
    }

    async fn insert_with_grant(&self, user: &User, grant: RoleGrant) -> AuthResult<InsertOutcome> {
        let mut state = self.lock();

        let Some(role) = grant.resolve(state.users.is_empty()) else {
            return Ok(InsertOutcome::AdminDenied);
        };

        if state.conflicts(user, None) {
            return Err(AuthError::UserExists);
        }

        let mut user = user.clone();
        user.user_role = role;
        state.users.push(user.clone());

        Ok(InsertOutcome::Inserted(user))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut state = self.lock();

        let idx = state
            .users
            .iter()
            .position(|u| u.user_id == user.user_id)
            .ok_or(AuthError::UserNotFound)?;

        if state.conflicts(user, Some(&state.users[idx])) {
            return Err(AuthError::UserExists);
        }

        state.users[idx] = user.clone();
        Ok(())
    }
}

// ============================================================================
// Revocation Repository Implementation
// ============================================================================

impl RevocationRepository for InMemoryAuthRepository {
    async fn revoke(&self, entry: &BlacklistEntry) -> AuthResult<bool> {
        let mut state = self.lock();
        if state.blacklist.contains_key(&entry.token) {
            return Ok(false);
        }
        state.blacklist.insert(entry.token.clone(), entry.clone());
        Ok(true)
    }

    async fn is_revoked(&self, token: &str) -> AuthResult<bool> {
        Ok(self.lock().blacklist.contains_key(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::{RawPassword, UserPassword};
    use crate::domain::value_object::user_role::UserRole;
    use chrono::Utc;

    fn user(email: &str, name: &str) -> User {
        let raw = RawPassword::for_verification("pw".to_string());
        User::new(
            Email::new(email).unwrap(),
            UserName::new(name).unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
            Utc::now(),
        )
    }

    fn inserted(outcome: InsertOutcome) -> User {
        match outcome {
            InsertOutcome::Inserted(u) => u,
            InsertOutcome::AdminDenied => panic!("expected insert"),
        }
    }

    #[tokio::test]
    async fn test_first_insert_becomes_admin() {
        let repo = InMemoryAuthRepository::new();

        let first = inserted(
            repo.insert_with_grant(&user("a@example.com", "alpha"), RoleGrant::Standard)
                .await
                .unwrap(),
        );
        assert_eq!(first.user_role, UserRole::Admin);

        let second = inserted(
            repo.insert_with_grant(&user("b@example.com", "bravo"), RoleGrant::Standard)
                .await
                .unwrap(),
        );
        assert_eq!(second.user_role, UserRole::Standard);

        let denied = repo
            .insert_with_grant(&user("c@example.com", "charlie"), RoleGrant::AdminIfFirst)
            .await
            .unwrap();
        assert!(matches!(denied, InsertOutcome::AdminDenied));
        assert_eq!(repo.user_count(), 2);
    }

    #[tokio::test]
    async fn test_uniqueness_on_email_and_canonical_name() {
        let repo = InMemoryAuthRepository::new();
        repo.insert_with_grant(&user("a@example.com", "alpha"), RoleGrant::Standard)
            .await
            .unwrap();

        let same_email = repo
            .insert_with_grant(&user("A@Example.com", "other"), RoleGrant::Standard)
            .await;
        assert!(matches!(same_email, Err(AuthError::UserExists)));

        let same_name = repo
            .insert_with_grant(&user("z@example.com", "ALPHA"), RoleGrant::Standard)
            .await;
        assert!(matches!(same_name, Err(AuthError::UserExists)));
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let repo = InMemoryAuthRepository::new();
        repo.insert_with_grant(&user("a@example.com", "alpha"), RoleGrant::Standard)
            .await
            .unwrap();
        let mut b = inserted(
            repo.insert_with_grant(&user("b@example.com", "bravo"), RoleGrant::Standard)
                .await
                .unwrap(),
        );

        b.change_email(Email::new("a@example.com").unwrap(), Utc::now());
        assert!(matches!(repo.update(&b).await, Err(AuthError::UserExists)));

        b.change_email(Email::new("b2@example.com").unwrap(), Utc::now());
        repo.update(&b).await.unwrap();
        let found = repo
            .find_by_email(&Email::new("b2@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.user_id), Some(b.user_id));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let repo = InMemoryAuthRepository::new();
        let entry = BlacklistEntry::new("tok", Utc::now());

        assert!(!repo.is_revoked("tok").await.unwrap());
        assert!(repo.revoke(&entry).await.unwrap());
        assert!(!repo.revoke(&BlacklistEntry::new("tok", Utc::now())).await.unwrap());
        assert!(repo.is_revoked("tok").await.unwrap());
        assert_eq!(repo.revoked_count(), 1);
    }
}

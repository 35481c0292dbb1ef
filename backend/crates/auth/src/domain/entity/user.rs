//! User Entity
//!
//! Account record: identity, credentials, role and confirmation state.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, public_id::PublicId, user_id::UserId, user_name::UserName,
    user_password::UserPassword, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (session subject)
    pub public_id: PublicId,
    /// Lower-cased, unique
    pub email: Email,
    /// Unique by canonical form
    pub user_name: UserName,
    pub password: UserPassword,
    pub user_role: UserRole,
    pub email_confirmed: bool,
    pub email_confirmed_at: Option<DateTime<Utc>>,
    /// When the latest confirmation mail was issued
    pub email_confirmation_sent_at: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unconfirmed user
    ///
    /// The role is provisional; storage settles it when the admin grant is
    /// resolved at insert time.
    pub fn new(
        email: Email,
        user_name: UserName,
        password: UserPassword,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            email,
            user_name,
            password,
            user_role: UserRole::Standard,
            email_confirmed: false,
            email_confirmed_at: None,
            email_confirmation_sent_at: Some(now),
            registered_at: now,
            updated_at: now,
        }
    }

    /// Mark the email as confirmed
    ///
    /// Returns `false` if it was already confirmed; nothing changes then.
    pub fn confirm_email(&mut self, now: DateTime<Utc>) -> bool {
        if self.email_confirmed {
            return false;
        }
        self.email_confirmed = true;
        self.email_confirmed_at = Some(now);
        self.updated_at = now;
        true
    }

    pub fn set_password(&mut self, password: UserPassword, now: DateTime<Utc>) {
        self.password = password;
        self.updated_at = now;
    }

    /// Switch to a new address; confirmation starts over
    pub fn change_email(&mut self, email: Email, now: DateTime<Utc>) {
        self.email = email;
        self.email_confirmed = false;
        self.email_confirmed_at = None;
        self.email_confirmation_sent_at = Some(now);
        self.updated_at = now;
    }

    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }
}

//! API DTOs (Data Transfer Objects)
//!
//! Field names are snake_case on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Register
// ============================================================================

/// POST /users
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub user: PublicIdBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicIdBody {
    pub public_id: String,
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ============================================================================
// Email / Password bodies
// ============================================================================

/// Reset request and email change
#[derive(Debug, Clone, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Password reset and password change
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatedResponse {
    pub updated: String,
}

// ============================================================================
// Users
// ============================================================================

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub public_id: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            public_id: user.public_id.to_string(),
            username: user.user_name.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_admin_defaults_to_false() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "email": "ann@example.com",
            "username": "ann",
            "password": "secret",
        }))
        .unwrap();
        assert!(!req.admin);
    }

    #[test]
    fn test_register_requires_every_field() {
        let res = serde_json::from_value::<RegisterRequest>(json!({
            "email": "ann@example.com",
            "password": "secret",
        }));
        assert!(res.is_err());
    }
}

//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{blacklist_entry::BlacklistEntry, user::User};
use crate::domain::repository::{InsertOutcome, RevocationRepository, RoleGrant, UserRepository};
use crate::domain::value_object::{
    email::Email, public_id::PublicId, user_id::UserId, user_name::UserName,
    user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Advisory lock key serializing registrations (bootstrap admin rule)
const REGISTRATION_LOCK_KEY: i64 = 0x6163_636f_756e_7473;

const USER_COLUMNS: &str = r#"
    user_id,
    public_id,
    email,
    user_name,
    user_name_canonical,
    password_hash,
    user_role,
    email_confirmed,
    email_confirmed_at,
    email_confirmation_sent_at,
    registered_at,
    updated_at
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.find_one("email", email.as_str()).await
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        self.find_one("user_name_canonical", user_name.canonical()).await
    }

    async fn find_by_public_id(&self, public_id: &PublicId) -> AuthResult<Option<User>> {
        self.find_one("public_id", public_id.as_str()).await
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY registered_at, user_id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn insert_with_grant(&self, user: &User, grant: RoleGrant) -> AuthResult<InsertOutcome> {
        let mut tx = self.pool.begin().await?;

        // Held until commit/rollback; concurrent registrations queue here
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(REGISTRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let any_user = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users)")
            .fetch_one(&mut *tx)
            .await?;

        let Some(role) = grant.resolve(!any_user) else {
            tx.rollback().await?;
            return Ok(InsertOutcome::AdminDenied);
        };

        let mut user = user.clone();
        user.user_role = role;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                public_id,
                email,
                user_name,
                user_name_canonical,
                password_hash,
                user_role,
                email_confirmed,
                email_confirmed_at,
                email_confirmation_sent_at,
                registered_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.public_id.as_str())
        .bind(user.email.as_str())
        .bind(user.user_name.as_str())
        .bind(user.user_name.canonical())
        .bind(user.password.as_phc_string())
        .bind(user.user_role.code())
        .bind(user.email_confirmed)
        .bind(user.email_confirmed_at)
        .bind(user.email_confirmation_sent_at)
        .bind(user.registered_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(InsertOutcome::Inserted(user))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                password_hash = $3,
                user_role = $4,
                email_confirmed = $5,
                email_confirmed_at = $6,
                email_confirmation_sent_at = $7,
                updated_at = $8
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.user_role.code())
        .bind(user.email_confirmed)
        .bind(user.email_confirmed_at)
        .bind(user.email_confirmation_sent_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }
}

// ============================================================================
// Revocation Repository Implementation
// ============================================================================

impl RevocationRepository for PgAuthRepository {
    async fn revoke(&self, entry: &BlacklistEntry) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO blacklist_tokens (entry_id, token, blacklisted_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(entry.entry_id.as_uuid())
        .bind(&entry.token)
        .bind(entry.blacklisted_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn is_revoked(&self, token: &str) -> AuthResult<bool> {
        let revoked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM blacklist_tokens WHERE token = $1)",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(revoked)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    public_id: String,
    email: String,
    user_name: String,
    user_name_canonical: String,
    password_hash: String,
    user_role: String,
    email_confirmed: bool,
    email_confirmed_at: Option<DateTime<Utc>>,
    email_confirmation_sent_at: Option<DateTime<Utc>>,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let public_id = PublicId::parse(&self.public_id)
            .ok_or_else(|| AuthError::Storage(format!("Invalid public_id: {}", self.public_id)))?;

        let user_role = UserRole::from_code(&self.user_role)
            .ok_or_else(|| AuthError::Storage(format!("Invalid user_role: {}", self.user_role)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            public_id,
            email: Email::from_db(self.email),
            user_name: UserName::from_db(self.user_name, self.user_name_canonical),
            password: UserPassword::from_db(self.password_hash)?,
            user_role,
            email_confirmed: self.email_confirmed,
            email_confirmed_at: self.email_confirmed_at,
            email_confirmation_sent_at: self.email_confirmation_sent_at,
            registered_at: self.registered_at,
            updated_at: self.updated_at,
        })
    }
}

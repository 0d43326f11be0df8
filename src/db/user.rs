//! User entity and repository
//!
//! Holds the credential store: user records with unique username/email and a
//! salted password hash. The hash never leaves this layer in a serializable
//! form; API responses use [`UserSummary`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

/// User entity from database.
///
/// Deliberately not `Serialize`: the password hash must never reach a response
/// body. Convert to [`UserSummary`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// User response DTO (excludes the password hash and profile internals)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    /// User unique identifier
    #[serde(rename = "userId")]
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: Uuid,
    /// Username
    #[schema(example = "alice")]
    pub username: String,
    /// User email address
    #[schema(example = "a@x.com")]
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user.
    ///
    /// A unique violation on email or username surfaces as a database error;
    /// the caller maps it to a 409. Trailing pad spaces from the fixed-width
    /// hash column are trimmed on the way out.
    pub async fn create(&self, input: NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, age, username, email, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, age, username, email,
                      trim(trailing from password_hash) AS password_hash,
                      created_at, updated_at
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.age)
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await
    }

    /// Find user by internal ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, age, username, email,
                   trim(trailing from password_hash) AS password_hash,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, age, username, email,
                   trim(trailing from password_hash) AS password_hash,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a user matching either the email or the username.
    ///
    /// Used by signup as an early collision check; the unique indexes remain
    /// the authority under concurrent signups.
    pub async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, age, username, email,
                   trim(trailing from password_hash) AS password_hash,
                   created_at, updated_at
            FROM users
            WHERE email = $1 OR username = $2
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            age: 30,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuvabcdefghijklmnopqrstuvwxyz0123".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_summary_from_user() {
        let user = sample_user();
        let summary = UserSummary::from(&user);
        assert_eq!(summary.user_id, user.id);
        assert_eq!(summary.username, "alice");
        assert_eq!(summary.email, "a@x.com");
    }

    #[test]
    fn test_user_summary_serialization_excludes_hash() {
        let user = sample_user();
        let json = serde_json::to_string(&UserSummary::from(&user)).unwrap();
        assert!(json.contains("\"userId\""));
        assert!(json.contains("\"username\""));
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$"));
    }
}

//! User accounts: patients, doctors and administrators.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(format!(
                "Unknown role '{}'. Must be one of: patient, doctor, admin",
                other
            )),
        }
    }
}

/// Stored user row. The password column is plaintext and must never be
/// serialized to clients; use [`UserResponse`] for that.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub created_at: String,
}

/// Public view of a user, as returned by the doctor listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            specialty: user.specialty,
        }
    }
}

/// Validated input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub specialty: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: String,
    pub role: String,
}

impl User {
    /// Insert a new user with a freshly generated id
    pub async fn create(db: &SqlitePool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = crate::db::format_timestamp(chrono::Utc::now());

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password, role, first_name, last_name, specialty, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.email)
        .bind(&input.password)
        .bind(input.role.as_str())
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.specialty)
        .bind(&created_at)
        .execute(db)
        .await?;

        Ok(User {
            id,
            email: input.email.clone(),
            password: input.password.clone(),
            role: input.role.as_str().to_string(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            specialty: input.specialty.clone(),
            created_at,
        })
    }

    /// Exact email and password match
    pub async fn find_by_credentials(
        db: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE email = ? AND password = ? LIMIT 1")
            .bind(email)
            .bind(password)
            .fetch_optional(db)
            .await
    }

    pub async fn list_by_role(db: &SqlitePool, role: Role) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE role = ? ORDER BY created_at ASC, rowid ASC")
            .bind(role.as_str())
            .fetch_all(db)
            .await
    }

    pub async fn count_by_role(db: &SqlitePool, role: Role) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role.as_str())
            .fetch_one(db)
            .await
    }
}

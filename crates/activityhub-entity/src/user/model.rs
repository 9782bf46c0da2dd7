//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered account. Customers and providers hang off a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique, lowercased login email.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Marketplace role.
    pub role: UserRole,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub is_deleted: bool,
}

impl User {
    /// Create a new active user.
    pub fn new(email: &str, password_hash: String, full_name: &str, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            password_hash,
            full_name: full_name.trim().to_string(),
            role,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }

    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.is_active && !self.is_deleted
    }

    /// Record a successful login.
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Deactivate the account.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

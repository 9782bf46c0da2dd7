//! Customer entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The booking profile of a user with the customer role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    /// Unique customer identifier.
    pub id: Uuid,
    /// Owning user (one customer per user).
    pub user_id: Uuid,
    /// Name shown to providers.
    pub display_name: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Points recorded locally after successful loyalty awards.
    pub loyalty_points: i64,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub is_deleted: bool,
}

impl Customer {
    /// Create a profile for the given user.
    pub fn new(user_id: Uuid, display_name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            display_name: display_name.trim().to_string(),
            phone: None,
            loyalty_points: 0,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }

    /// Replace the editable profile fields.
    pub fn update_profile(&mut self, display_name: Option<String>, phone: Option<String>) {
        if let Some(name) = display_name {
            self.display_name = name.trim().to_string();
        }
        if let Some(phone) = phone {
            self.phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
        }
        self.updated_at = Utc::now();
    }

    /// Add points confirmed by the loyalty program.
    pub fn add_loyalty_points(&mut self, points: i64) {
        self.loyalty_points += points.max(0);
        self.updated_at = Utc::now();
    }
}

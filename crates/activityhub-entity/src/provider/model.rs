//! Activity provider entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use activityhub_core::error::AppError;

/// A business offering activities on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityProvider {
    /// Unique provider identifier.
    pub id: Uuid,
    /// User that owns and manages this provider.
    pub owner_user_id: Uuid,
    /// Public business name.
    pub name: String,
    /// Public description.
    pub description: Option<String>,
    /// Contact email for booking notifications.
    pub contact_email: String,
    /// Set by an admin after review.
    pub is_verified: bool,
    /// When the provider was created.
    pub created_at: DateTime<Utc>,
    /// When the provider was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub is_deleted: bool,
}

impl ActivityProvider {
    /// Create an unverified provider owned by the given user.
    pub fn new(
        owner_user_id: Uuid,
        name: &str,
        description: Option<String>,
        contact_email: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_user_id,
            name: name.trim().to_string(),
            description,
            contact_email: contact_email.trim().to_lowercase(),
            is_verified: false,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }

    /// Whether the given user owns this provider.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_user_id == user_id
    }

    /// Replace the editable fields.
    pub fn update_details(
        &mut self,
        name: Option<String>,
        description: Option<String>,
        contact_email: Option<String>,
    ) {
        if let Some(name) = name {
            self.name = name.trim().to_string();
        }
        if description.is_some() {
            self.description = description;
        }
        if let Some(email) = contact_email {
            self.contact_email = email.trim().to_lowercase();
        }
        self.updated_at = Utc::now();
    }

    /// Mark the provider as verified.
    pub fn verify(&mut self) -> Result<(), AppError> {
        if self.is_verified {
            return Err(AppError::invalid_state("Provider is already verified"));
        }
        self.is_verified = true;
        self.updated_at = Utc::now();
        Ok(())
    }
}

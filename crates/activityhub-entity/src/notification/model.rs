//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use activityhub_core::error::AppError;

use super::kind::NotificationKind;

/// An in-app notification delivered to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// Notification kind (see [`NotificationKind`]).
    pub kind: String,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Resource type involved (if applicable).
    pub resource_type: Option<String>,
    /// Resource ID involved (if applicable).
    pub resource_id: Option<Uuid>,
    /// Whether the user has read this notification.
    pub is_read: bool,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the notification was deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Create an unread notification.
    pub fn new(
        user_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind: kind.as_str().to_string(),
            title: title.into(),
            message: message.into(),
            resource_type: None,
            resource_id: None,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Attach the resource the notification is about.
    pub fn with_resource(mut self, resource_type: &str, resource_id: Uuid) -> Self {
        self.resource_type = Some(resource_type.to_string());
        self.resource_id = Some(resource_id);
        self
    }

    /// Check if the notification has been read.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Mark as read. Marking twice is a no-op.
    pub fn mark_read(&mut self) {
        if !self.is_read {
            self.is_read = true;
            self.read_at = Some(Utc::now());
        }
    }

    /// Soft-delete the notification.
    pub fn soft_delete(&mut self) -> Result<(), AppError> {
        if self.is_deleted {
            return Err(AppError::invalid_state("Notification is already deleted"));
        }
        self.is_deleted = true;
        self.deleted_at = Some(Utc::now());
        Ok(())
    }
}

//! Activity entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use activityhub_core::error::AppError;

use super::status::ActivityStatus;

/// Upper bound on the per-participant price, in cents.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Something a customer can book with a provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    /// Unique activity identifier.
    pub id: Uuid,
    /// Offering provider.
    pub provider_id: Uuid,
    /// Approved location where the activity takes place.
    pub location_id: Option<Uuid>,
    /// Listing title.
    pub title: String,
    /// Listing description.
    pub description: String,
    /// Free-form category (e.g. `"outdoor"`, `"cooking"`).
    pub category: String,
    /// Price per participant in minor currency units.
    pub price_cents: i64,
    /// ISO-4217 currency code.
    pub currency: String,
    /// Default number of seats for new time slots.
    pub capacity: i32,
    /// Publication status.
    pub status: ActivityStatus,
    /// When the activity was first published.
    pub published_at: Option<DateTime<Utc>>,
    /// When the activity was archived.
    pub archived_at: Option<DateTime<Utc>>,
    /// When the activity was created.
    pub created_at: DateTime<Utc>,
    /// When the activity was last updated.
    pub updated_at: DateTime<Utc>,
    /// User that created the activity.
    pub created_by: Uuid,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the activity was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Editable listing fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityDetails {
    /// Listing title.
    pub title: Option<String>,
    /// Listing description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Price per participant in cents.
    pub price_cents: Option<i64>,
    /// Default seats per slot.
    pub capacity: Option<i32>,
    /// Location.
    pub location_id: Option<Uuid>,
}

impl Activity {
    /// Create a new draft activity.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider_id: Uuid,
        created_by: Uuid,
        title: &str,
        description: &str,
        category: &str,
        price_cents: i64,
        currency: &str,
        capacity: i32,
        location_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        validate_listing(title, price_cents, capacity)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            provider_id,
            location_id,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            category: category.trim().to_lowercase(),
            price_cents,
            currency: currency.trim().to_uppercase(),
            capacity,
            status: ActivityStatus::Draft,
            published_at: None,
            archived_at: None,
            created_at: now,
            updated_at: now,
            created_by,
            is_deleted: false,
            deleted_at: None,
        })
    }

    /// Whether customers may see and book this activity.
    pub fn is_bookable(&self) -> bool {
        self.status == ActivityStatus::Published && !self.is_deleted
    }

    /// Apply listing changes. Archived activities are read-only.
    pub fn update_details(&mut self, details: ActivityDetails) -> Result<(), AppError> {
        if self.status == ActivityStatus::Archived {
            return Err(AppError::invalid_state("Cannot edit an archived activity"));
        }
        let title = details.title.unwrap_or_else(|| self.title.clone());
        let price_cents = details.price_cents.unwrap_or(self.price_cents);
        let capacity = details.capacity.unwrap_or(self.capacity);
        validate_listing(&title, price_cents, capacity)?;

        self.title = title.trim().to_string();
        self.price_cents = price_cents;
        self.capacity = capacity;
        if let Some(description) = details.description {
            self.description = description.trim().to_string();
        }
        if let Some(category) = details.category {
            self.category = category.trim().to_lowercase();
        }
        if details.location_id.is_some() {
            self.location_id = details.location_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Publish a draft.
    pub fn publish(&mut self) -> Result<(), AppError> {
        if self.status != ActivityStatus::Draft {
            return Err(AppError::invalid_state(format!(
                "Only draft activities can be published (current status: {})",
                self.status
            )));
        }
        validate_listing(&self.title, self.price_cents, self.capacity)?;
        let now = Utc::now();
        self.status = ActivityStatus::Published;
        self.published_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Withdraw a draft or published activity.
    pub fn archive(&mut self) -> Result<(), AppError> {
        if self.status == ActivityStatus::Archived {
            return Err(AppError::invalid_state("Activity is already archived"));
        }
        let now = Utc::now();
        self.status = ActivityStatus::Archived;
        self.archived_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Soft-delete the activity.
    pub fn soft_delete(&mut self) -> Result<(), AppError> {
        if self.is_deleted {
            return Err(AppError::invalid_state("Activity is already deleted"));
        }
        let now = Utc::now();
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

fn validate_listing(title: &str, price_cents: i64, capacity: i32) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::validation("Activity title is required"));
    }
    if price_cents < 0 {
        return Err(AppError::validation("Activity price cannot be negative"));
    }
    if price_cents > MAX_PRICE_CENTS {
        return Err(AppError::validation(format!(
            "Activity price cannot exceed {MAX_PRICE_CENTS} cents"
        )));
    }
    if capacity <= 0 {
        return Err(AppError::validation("Activity capacity must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use activityhub_core::ErrorKind;

    use super::*;

    fn draft() -> Activity {
        Activity::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Kayak tour",
            "Two hours on the lake",
            "Outdoor",
            4_500,
            "eur",
            8,
            None,
        )
        .expect("valid activity")
    }

    #[test]
    fn test_new_is_draft_and_normalized() {
        let activity = draft();
        assert_eq!(activity.status, ActivityStatus::Draft);
        assert_eq!(activity.category, "outdoor");
        assert_eq!(activity.currency, "EUR");
        assert!(!activity.is_bookable());
    }

    #[test]
    fn test_publish_then_archive() {
        let mut activity = draft();
        activity.publish().expect("publish");
        assert!(activity.is_bookable());
        assert!(activity.published_at.is_some());

        let err = activity.publish().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);

        activity.archive().expect("archive");
        assert_eq!(activity.status, ActivityStatus::Archived);
        assert!(activity.archive().is_err());
    }

    #[test]
    fn test_archived_is_read_only() {
        let mut activity = draft();
        activity.archive().expect("archive");
        let err = activity
            .update_details(ActivityDetails {
                title: Some("New".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut activity = draft();
        let err = activity
            .update_details(ActivityDetails {
                price_cents: Some(-1),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(activity.price_cents, 4_500);
    }

    #[test]
    fn test_rejects_price_above_cap() {
        let mut activity = draft();
        let err = activity
            .update_details(ActivityDetails {
                price_cents: Some(MAX_PRICE_CENTS + 1),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        activity
            .update_details(ActivityDetails {
                price_cents: Some(MAX_PRICE_CENTS),
                ..Default::default()
            })
            .expect("price at the cap");
    }
}

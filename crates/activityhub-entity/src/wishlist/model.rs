//! Wishlist entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An activity saved by a customer. `(customer_id, activity_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WishlistItem {
    /// Unique entry identifier.
    pub id: Uuid,
    /// Owning customer.
    pub customer_id: Uuid,
    /// Saved activity.
    pub activity_id: Uuid,
    /// When the activity was saved.
    pub created_at: DateTime<Utc>,
}

impl WishlistItem {
    /// Create a wishlist entry.
    pub fn new(customer_id: Uuid, activity_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            activity_id,
            created_at: Utc::now(),
        }
    }
}

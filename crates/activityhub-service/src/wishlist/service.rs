//! Wishlist entries.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_database::traits::{ActivityStore, CustomerStore, WishlistStore};
use activityhub_entity::wishlist::WishlistItem;

use crate::access::{customer_profile, load_activity};
use crate::context::RequestContext;

/// Manages the caller's wishlist.
#[derive(Debug, Clone)]
pub struct WishlistService {
    wishlist: Arc<dyn WishlistStore>,
    customers: Arc<dyn CustomerStore>,
    activities: Arc<dyn ActivityStore>,
}

impl WishlistService {
    /// Creates a new wishlist service.
    pub fn new(
        wishlist: Arc<dyn WishlistStore>,
        customers: Arc<dyn CustomerStore>,
        activities: Arc<dyn ActivityStore>,
    ) -> Self {
        Self {
            wishlist,
            customers,
            activities,
        }
    }

    /// Save an activity to the wishlist.
    pub async fn add_to_wishlist(
        &self,
        ctx: &RequestContext,
        activity_id: Uuid,
    ) -> AppResult<WishlistItem> {
        let user_id = ctx.require_user()?;
        let customer = customer_profile(self.customers.as_ref(), user_id).await?;
        let activity = load_activity(self.activities.as_ref(), activity_id).await?;

        if self
            .wishlist
            .find_entry(customer.id, activity.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Activity is already in your wishlist"));
        }

        let item = self
            .wishlist
            .create(&WishlistItem::new(customer.id, activity.id))
            .await?;
        info!(customer_id = %customer.id, activity_id = %activity.id, "Added to wishlist");
        Ok(item)
    }

    /// Remove an activity from the wishlist.
    pub async fn remove_from_wishlist(
        &self,
        ctx: &RequestContext,
        activity_id: Uuid,
    ) -> AppResult<()> {
        let user_id = ctx.require_user()?;
        let customer = customer_profile(self.customers.as_ref(), user_id).await?;
        let entry = self
            .wishlist
            .find_entry(customer.id, activity_id)
            .await?
            .ok_or_else(|| AppError::not_found("Activity is not in your wishlist"))?;

        self.wishlist.delete(&entry.id).await?;
        info!(customer_id = %customer.id, activity_id = %activity_id, "Removed from wishlist");
        Ok(())
    }

    /// The caller's wishlist, newest first.
    pub async fn list_wishlist(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<WishlistItem>> {
        let user_id = ctx.require_user()?;
        let customer = customer_profile(self.customers.as_ref(), user_id).await?;
        self.wishlist.find_by_customer(customer.id, page).await
    }
}

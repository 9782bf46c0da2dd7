//! Activity lifecycle: draft, publish, archive, soft delete.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{MAX_PAGE_SIZE, PageRequest, PageResponse};
use activityhub_database::traits::{ActivityStore, ProviderStore};
use activityhub_entity::activity::{Activity, ActivityDetails};

use crate::access::{load_activity, load_provider, owned_activity, owned_provider};
use crate::context::RequestContext;

/// Listing input for a new activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Category.
    pub category: String,
    /// Price per participant in cents.
    pub price_cents: i64,
    /// ISO-4217 currency code.
    pub currency: String,
    /// Default seats per time slot.
    pub capacity: i32,
    /// Approved location.
    pub location_id: Option<Uuid>,
}

/// Manages activities.
#[derive(Debug, Clone)]
pub struct ActivityService {
    activities: Arc<dyn ActivityStore>,
    providers: Arc<dyn ProviderStore>,
}

impl ActivityService {
    /// Creates a new activity service.
    pub fn new(activities: Arc<dyn ActivityStore>, providers: Arc<dyn ProviderStore>) -> Self {
        Self {
            activities,
            providers,
        }
    }

    /// Create a draft activity under a provider the caller owns.
    pub async fn create_activity(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
        input: NewActivity,
    ) -> AppResult<Activity> {
        let user_id = ctx.require_user()?;
        let provider = owned_provider(self.providers.as_ref(), user_id, provider_id).await?;

        let activity = Activity::new(
            provider.id,
            user_id,
            &input.title,
            &input.description,
            &input.category,
            input.price_cents,
            &input.currency,
            input.capacity,
            input.location_id,
        )?;
        let activity = self.activities.create(&activity).await?;

        info!(activity_id = %activity.id, provider_id = %provider.id, "Activity created");
        Ok(activity)
    }

    /// Edit listing fields.
    pub async fn update_activity(
        &self,
        ctx: &RequestContext,
        activity_id: Uuid,
        details: ActivityDetails,
    ) -> AppResult<Activity> {
        let mut activity = self.owned(ctx, activity_id).await?;
        activity.update_details(details)?;
        let activity = self.activities.update(&activity).await?;

        info!(activity_id = %activity.id, "Activity updated");
        Ok(activity)
    }

    /// `draft → published`.
    pub async fn publish_activity(
        &self,
        ctx: &RequestContext,
        activity_id: Uuid,
    ) -> AppResult<Activity> {
        let mut activity = self.owned(ctx, activity_id).await?;
        activity.publish()?;
        let activity = self.activities.update(&activity).await?;

        info!(activity_id = %activity.id, "Activity published");
        Ok(activity)
    }

    /// `draft | published → archived`.
    pub async fn archive_activity(
        &self,
        ctx: &RequestContext,
        activity_id: Uuid,
    ) -> AppResult<Activity> {
        let mut activity = self.owned(ctx, activity_id).await?;
        activity.archive()?;
        let activity = self.activities.update(&activity).await?;

        info!(activity_id = %activity.id, "Activity archived");
        Ok(activity)
    }

    /// Soft-delete an activity.
    pub async fn delete_activity(&self, ctx: &RequestContext, activity_id: Uuid) -> AppResult<()> {
        let mut activity = self.owned(ctx, activity_id).await?;
        activity.soft_delete()?;
        self.activities.update(&activity).await?;

        info!(activity_id = %activity.id, "Activity deleted");
        Ok(())
    }

    /// A single activity.
    ///
    /// Drafts and archived listings are visible only to their provider's
    /// owner and to admins; everyone else gets `NotFound`.
    pub async fn get_activity(
        &self,
        ctx: &RequestContext,
        activity_id: Uuid,
    ) -> AppResult<Activity> {
        let activity = load_activity(self.activities.as_ref(), activity_id).await?;
        if activity.is_bookable() || self.can_manage(ctx, activity.provider_id).await? {
            return Ok(activity);
        }
        Err(AppError::not_found(format!("Activity {activity_id} not found")))
    }

    /// Published activities, optionally filtered by category.
    pub async fn list_published(
        &self,
        page: &PageRequest,
        category: Option<&str>,
    ) -> AppResult<PageResponse<Activity>> {
        let category = category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());
        self.activities
            .find_published(page, category.as_deref())
            .await
    }

    /// A provider's activities. The owner and admins see every status.
    pub async fn list_provider_activities(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Activity>> {
        load_provider(self.providers.as_ref(), provider_id).await?;
        if self.can_manage(ctx, provider_id).await? {
            return self.activities.find_by_provider(provider_id, page).await;
        }

        let mut published = Vec::new();
        let mut cursor = PageRequest::new(1, MAX_PAGE_SIZE);
        loop {
            let batch = self.activities.find_by_provider(provider_id, &cursor).await?;
            let has_next = batch.has_next();
            published.extend(batch.items.into_iter().filter(Activity::is_bookable));
            if !has_next {
                break;
            }
            cursor = PageRequest::new(cursor.page + 1, MAX_PAGE_SIZE);
        }
        Ok(PageResponse::paginate(published, page))
    }

    async fn owned(&self, ctx: &RequestContext, activity_id: Uuid) -> AppResult<Activity> {
        let user_id = ctx.require_user()?;
        let (activity, _) = owned_activity(
            self.activities.as_ref(),
            self.providers.as_ref(),
            user_id,
            activity_id,
        )
        .await?;
        Ok(activity)
    }

    async fn can_manage(&self, ctx: &RequestContext, provider_id: Uuid) -> AppResult<bool> {
        let Some(user_id) = ctx.user_id else {
            return Ok(false);
        };
        if ctx.is_admin() {
            return Ok(true);
        }
        Ok(self
            .providers
            .find_by_id(&provider_id)
            .await?
            .is_some_and(|p| p.is_owned_by(user_id)))
    }
}

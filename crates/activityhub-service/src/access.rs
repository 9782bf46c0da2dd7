//! Loading helpers shared by the services.
//!
//! Each returns `NotFound` when the row is missing and `Authorization`
//! when the caller does not own it.

use uuid::Uuid;

use activityhub_core::error::{AppError, ErrorKind};
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_database::traits::{ActivityStore, CustomerStore, ProviderStore};
use activityhub_entity::activity::Activity;
use activityhub_entity::customer::Customer;
use activityhub_entity::provider::ActivityProvider;

use crate::context::RequestContext;

pub(crate) async fn load_provider(
    providers: &dyn ProviderStore,
    provider_id: Uuid,
) -> AppResult<ActivityProvider> {
    providers
        .find_by_id(&provider_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Provider {provider_id} not found")))
}

pub(crate) async fn load_activity(
    activities: &dyn ActivityStore,
    activity_id: Uuid,
) -> AppResult<Activity> {
    activities
        .find_by_id(&activity_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Activity {activity_id} not found")))
}

/// Load a provider the caller owns.
pub(crate) async fn owned_provider(
    providers: &dyn ProviderStore,
    user_id: Uuid,
    provider_id: Uuid,
) -> AppResult<ActivityProvider> {
    let provider = load_provider(providers, provider_id).await?;
    if !provider.is_owned_by(user_id) {
        return Err(AppError::authorization("You do not own this provider"));
    }
    Ok(provider)
}

/// Load a provider the caller owns, or any provider for admins.
pub(crate) async fn managed_provider(
    providers: &dyn ProviderStore,
    ctx: &RequestContext,
    provider_id: Uuid,
) -> AppResult<ActivityProvider> {
    let user_id = ctx.require_user()?;
    let provider = load_provider(providers, provider_id).await?;
    if !provider.is_owned_by(user_id) && !ctx.is_admin() {
        return Err(AppError::authorization("You do not own this provider"));
    }
    Ok(provider)
}

/// Load an activity together with its provider, checking the caller owns it.
pub(crate) async fn owned_activity(
    activities: &dyn ActivityStore,
    providers: &dyn ProviderStore,
    user_id: Uuid,
    activity_id: Uuid,
) -> AppResult<(Activity, ActivityProvider)> {
    let activity = load_activity(activities, activity_id).await?;
    let provider = owned_provider(providers, user_id, activity.provider_id)
        .await
        .map_err(|e| {
            if e.is(ErrorKind::Authorization) {
                AppError::authorization("You do not own this activity")
            } else {
                e
            }
        })?;
    Ok((activity, provider))
}

/// The caller's customer profile.
pub(crate) async fn customer_profile(
    customers: &dyn CustomerStore,
    user_id: Uuid,
) -> AppResult<Customer> {
    customers.find_by_user(user_id).await?.ok_or_else(|| {
        AppError::authorization("A customer profile is required for this operation")
    })
}

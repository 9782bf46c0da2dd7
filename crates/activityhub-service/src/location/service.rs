//! Location moderation.
//!
//! Providers submit location requests; admins approve them, which creates
//! a [`Location`], or reject them with a note. Both outcomes notify the
//! requester.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_database::traits::{LocationRequestStore, LocationStore, ProviderStore};
use activityhub_entity::location::{
    Location, LocationRequest, LocationRequestStatus, NewLocationRequest,
};
use activityhub_entity::notification::{Notification, NotificationKind};

use crate::access::{managed_provider, owned_provider};
use crate::context::RequestContext;
use crate::notification::NotificationService;

/// Manages location requests and locations.
#[derive(Debug, Clone)]
pub struct LocationService {
    requests: Arc<dyn LocationRequestStore>,
    locations: Arc<dyn LocationStore>,
    providers: Arc<dyn ProviderStore>,
    notifications: Arc<NotificationService>,
}

impl LocationService {
    /// Creates a new location service.
    pub fn new(
        requests: Arc<dyn LocationRequestStore>,
        locations: Arc<dyn LocationStore>,
        providers: Arc<dyn ProviderStore>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            requests,
            locations,
            providers,
            notifications,
        }
    }

    /// Submit a new location for review on behalf of a provider.
    pub async fn submit_location_request(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
        input: NewLocationRequest,
    ) -> AppResult<LocationRequest> {
        let user_id = ctx.require_user()?;
        let provider = owned_provider(self.providers.as_ref(), user_id, provider_id).await?;

        let request = LocationRequest::new(provider.id, user_id, input)?;
        let request = self.requests.create(&request).await?;

        info!(request_id = %request.id, provider_id = %provider.id, "Location request submitted");
        Ok(request)
    }

    /// A provider's requests, newest first. Owner or admin.
    pub async fn list_my_location_requests(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LocationRequest>> {
        let provider = managed_provider(self.providers.as_ref(), ctx, provider_id).await?;
        self.requests.find_by_provider(provider.id, page).await
    }

    /// Requests awaiting review, oldest first. Admin only.
    pub async fn list_pending_location_requests(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LocationRequest>> {
        ctx.require_admin()?;
        self.requests
            .find_by_status(LocationRequestStatus::Pending, page)
            .await
    }

    /// Approve a pending request and create its location. Admin only.
    pub async fn approve_location_request(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> AppResult<LocationRequest> {
        let admin_id = ctx.require_admin()?;
        let mut request = self.load(request_id).await?;

        let location = Location::from_request(&request, admin_id);
        request.approve(admin_id, location.id)?;
        let location = self.locations.create(&location).await?;
        let request = self.requests.update(&request).await?;

        info!(
            request_id = %request.id,
            location_id = %location.id,
            admin_id = %admin_id,
            "Location request approved"
        );

        self.notifications
            .notify_best_effort(
                Notification::new(
                    request.requested_by,
                    NotificationKind::LocationApproved,
                    "Location approved",
                    format!("Your location '{}' has been approved", request.name),
                )
                .with_resource("location", location.id),
            )
            .await;

        Ok(request)
    }

    /// Reject a pending request with a note. Admin only.
    pub async fn reject_location_request(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        note: &str,
    ) -> AppResult<LocationRequest> {
        let admin_id = ctx.require_admin()?;
        let mut request = self.load(request_id).await?;
        request.reject(admin_id, note)?;
        let request = self.requests.update(&request).await?;

        info!(request_id = %request.id, admin_id = %admin_id, "Location request rejected");

        self.notifications
            .notify_best_effort(
                Notification::new(
                    request.requested_by,
                    NotificationKind::LocationRejected,
                    "Location rejected",
                    format!("Your location '{}' was rejected: {}", request.name, note.trim()),
                )
                .with_resource("location_request", request.id),
            )
            .await;

        Ok(request)
    }

    /// Approved locations.
    pub async fn list_locations(&self, page: &PageRequest) -> AppResult<PageResponse<Location>> {
        self.locations.find_all(page).await
    }

    /// One approved location.
    pub async fn get_location(&self, location_id: Uuid) -> AppResult<Location> {
        self.locations
            .find_by_id(&location_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Location {location_id} not found")))
    }

    async fn load(&self, request_id: Uuid) -> AppResult<LocationRequest> {
        self.requests
            .find_by_id(&request_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Location request {request_id} not found"))
            })
    }
}

#[cfg(test)]
mod tests {
    use activityhub_core::ErrorKind;

    use super::*;
    use crate::testing::Fixture;

    fn harbour() -> NewLocationRequest {
        NewLocationRequest {
            name: "Old Harbour".into(),
            address: "1 Quay Street".into(),
            city: "Marseille".into(),
            country: "FR".into(),
            latitude: Some(43.2951),
            longitude: Some(5.3745),
        }
    }

    #[tokio::test]
    async fn test_approval_creates_location_and_notifies() {
        let fx = Fixture::new();
        let (owner, provider) = fx.provider("owner@example.com").await;
        let admin = fx.admin().await;
        let locations = &fx.services.locations;

        let request = locations
            .submit_location_request(&owner, provider.id, harbour())
            .await
            .expect("submit");

        let pending = locations
            .list_pending_location_requests(&admin, &PageRequest::default())
            .await
            .expect("pending");
        assert_eq!(pending.total_items, 1);

        let approved = locations
            .approve_location_request(&admin, request.id)
            .await
            .expect("approve");
        assert_eq!(approved.status, LocationRequestStatus::Approved);
        let location_id = approved.location_id.expect("linked location");
        let location = locations.get_location(location_id).await.expect("location");
        assert_eq!(location.city, "Marseille");

        let unread = fx
            .services
            .notifications
            .unread_count(&owner)
            .await
            .expect("count");
        assert_eq!(unread, 1);

        let err = locations
            .approve_location_request(&admin, request.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn test_rejection_requires_admin_and_note() {
        let fx = Fixture::new();
        let (owner, provider) = fx.provider("owner@example.com").await;
        let admin = fx.admin().await;
        let locations = &fx.services.locations;
        let request = locations
            .submit_location_request(&owner, provider.id, harbour())
            .await
            .expect("submit");

        let err = locations
            .reject_location_request(&owner, request.id, "nope")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = locations
            .reject_location_request(&admin, request.id, "  ")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let rejected = locations
            .reject_location_request(&admin, request.id, "Address not found")
            .await
            .expect("reject");
        assert_eq!(rejected.status, LocationRequestStatus::Rejected);
        assert_eq!(rejected.review_note.as_deref(), Some("Address not found"));
    }

    #[tokio::test]
    async fn test_submit_for_foreign_provider_is_rejected() {
        let fx = Fixture::new();
        let (_, provider) = fx.provider("owner@example.com").await;
        let (intruder, _) = fx.provider("intruder@example.com").await;
        let err = fx
            .services
            .locations
            .submit_location_request(&intruder, provider.id, harbour())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
}

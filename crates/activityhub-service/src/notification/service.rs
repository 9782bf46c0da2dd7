//! Notification inbox and delivery.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_database::traits::NotificationStore;
use activityhub_entity::notification::Notification;

use crate::context::RequestContext;

/// Manages user notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    /// The caller's notifications, newest first.
    pub async fn list_notifications(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let user_id = ctx.require_user()?;
        self.notifications.find_by_user(user_id, page).await
    }

    /// Number of unread notifications.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        let user_id = ctx.require_user()?;
        self.notifications.count_unread(user_id).await
    }

    /// Mark one notification as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> AppResult<Notification> {
        let mut notification = self.owned(ctx, notification_id).await?;
        notification.mark_read();
        self.notifications.update(&notification).await
    }

    /// Mark all of the caller's notifications as read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let user_id = ctx.require_user()?;
        let count = self.notifications.mark_all_read(user_id).await?;
        info!(user_id = %user_id, count, "Notifications marked read");
        Ok(count)
    }

    /// Soft-delete a notification.
    pub async fn delete_notification(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> AppResult<()> {
        let mut notification = self.owned(ctx, notification_id).await?;
        notification.soft_delete()?;
        self.notifications.update(&notification).await?;
        Ok(())
    }

    /// Store a notification for its recipient.
    pub async fn notify(&self, notification: Notification) -> AppResult<Notification> {
        let notification = self.notifications.create(&notification).await?;
        info!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = %notification.kind,
            "Notification created"
        );
        Ok(notification)
    }

    /// Store a notification, logging instead of failing.
    pub async fn notify_best_effort(&self, notification: Notification) {
        let user_id = notification.user_id;
        let kind = notification.kind.clone();
        if let Err(e) = self.notify(notification).await {
            warn!(user_id = %user_id, kind = %kind, error = %e, "Failed to create notification");
        }
    }

    async fn owned(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<Notification> {
        let user_id = ctx.require_user()?;
        let notification = self
            .notifications
            .find_by_id(&notification_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Notification {notification_id} not found"))
            })?;
        if notification.user_id != user_id {
            return Err(AppError::authorization(
                "You cannot access another user's notification",
            ));
        }
        Ok(notification)
    }
}

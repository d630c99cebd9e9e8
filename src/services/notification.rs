//! Notification service
//!
//! Creates notification rows for system events and lets the owning user
//! mark them read. Delivery beyond the stored row (e-mail, Telegram) is
//! outside this service. Review-outcome notifications are best-effort: a
//! failed insert is logged, never allowed to fail the review itself.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{CreateNotificationRequest, Notification, Tier};
use crate::services::stores::NotificationStore;
use crate::utils::errors::{Result, TholviError};

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    enabled: bool,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>, enabled: bool) -> Self {
        Self { store, enabled }
    }

    pub async fn notify_payment_approved(&self, user_id: Uuid, tier: Tier) {
        self.notify(CreateNotificationRequest {
            user_id,
            title: "Payment approved".to_string(),
            message: format!("Your payment was approved. Your account is now on {tier}."),
            kind: "payment_approved".to_string(),
        })
        .await;
    }

    pub async fn notify_payment_rejected(&self, user_id: Uuid, reason: &str) {
        self.notify(CreateNotificationRequest {
            user_id,
            title: "Payment rejected".to_string(),
            message: format!("Your payment was rejected: {reason}"),
            kind: "payment_rejected".to_string(),
        })
        .await;
    }

    async fn notify(&self, request: CreateNotificationRequest) {
        if !self.enabled {
            debug!(user_id = %request.user_id, kind = %request.kind, "Notifications disabled, skipping");
            return;
        }

        if let Err(e) = self.store.create(request).await {
            warn!(error = %e, "Failed to store notification");
        }
    }

    /// A user's notifications, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.store.list_for_user(user_id).await
    }

    /// Mark a notification read. Only the owning user may do this.
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<()> {
        let notification = self
            .store
            .get_by_id(notification_id)
            .await?
            .ok_or(TholviError::NotificationNotFound { notification_id })?;

        if notification.user_id != user_id {
            return Err(TholviError::Forbidden(
                "Cannot mark another user's notification as read".to_string(),
            ));
        }

        self.store.mark_read(notification_id).await
    }
}

//! Payment lifecycle service
//!
//! Implements the manual review state machine: a user submits an
//! out-of-band payment reference, an admin approves or rejects it exactly
//! once, and approval raises the owner's tier. The `pending` precondition
//! is enforced by the store's conditional update so that of two racing
//! reviewers only one wins; the loser gets a distinct "already reviewed"
//! error.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::models::{
    AdminPaymentRow, PaymentFilter, PaymentRequest, PaymentStatus, ReviewFields,
    SubmitPaymentRequest, Tier, UserAccount, UserRole,
};
use crate::services::notification::NotificationService;
use crate::services::stores::{PaymentStore, UserDirectory};
use crate::utils::errors::{Result, TholviError};
use crate::utils::logging::{log_payment_review, log_tier_change};

/// Payment review service
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentStore>,
    users: Arc<dyn UserDirectory>,
    notifications: NotificationService,
}

impl PaymentService {
    pub fn new(
        payments: Arc<dyn PaymentStore>,
        users: Arc<dyn UserDirectory>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            payments,
            users,
            notifications,
        }
    }

    /// Submit a new payment request.
    ///
    /// The transaction id is an unverified reference string pending manual
    /// review. Multiple concurrent pending requests by the same user are
    /// allowed; the review queue shows them all and the admin resolves
    /// duplicates.
    pub async fn submit(&self, request: SubmitPaymentRequest) -> Result<PaymentRequest> {
        if request.tier_requested == Tier::Free {
            return Err(TholviError::Validation(
                "Cannot request an upgrade to the free tier".to_string(),
            ));
        }

        if request.transaction_id.trim().is_empty() {
            return Err(TholviError::Validation(
                "Transaction ID is required".to_string(),
            ));
        }

        let user = self
            .users
            .find_account(request.user_id)
            .await?
            .ok_or(TholviError::UserNotFound {
                user_id: request.user_id,
            })?;

        if user.is_banned {
            return Err(TholviError::Forbidden(
                "Banned accounts cannot submit payment requests".to_string(),
            ));
        }

        let payment = self.payments.create(request).await?;
        info!(
            payment_id = %payment.id,
            user_id = %payment.user_id,
            tier_requested = %payment.tier_requested,
            "Payment request submitted"
        );

        Ok(payment)
    }

    /// Approve a pending payment request and raise the owner's tier.
    ///
    /// The status write and the tier write are two separate calls against
    /// the hosted store. If the tier write fails after the status flipped,
    /// the error is surfaced and the reconciliation job later raises the
    /// user from the approved-payment floor.
    pub async fn approve(&self, payment_id: Uuid, reviewer_id: Uuid) -> Result<PaymentRequest> {
        self.require_admin(reviewer_id).await?;

        let payment = self.load_pending(payment_id).await?;

        let review = ReviewFields {
            reviewed_by: reviewer_id,
            reviewed_at: Utc::now(),
            rejection_reason: None,
        };

        let won = self
            .payments
            .update_status(payment_id, PaymentStatus::Pending, PaymentStatus::Approved, review)
            .await?;
        if !won {
            // Lost the race to another reviewer between our read and the
            // conditional update.
            return Err(self.already_reviewed(payment_id).await);
        }

        log_payment_review(payment_id, reviewer_id, PaymentStatus::Approved, None);

        let previous_tier = self.users.get_tier(payment.user_id).await?;
        if let Err(e) = self
            .users
            .set_tier(payment.user_id, payment.tier_requested)
            .await
        {
            error!(
                payment_id = %payment_id,
                user_id = %payment.user_id,
                error = %e,
                "Tier upgrade failed after approval; user is under-provisioned until reconciliation"
            );
            return Err(e);
        }
        log_tier_change(
            payment.user_id,
            previous_tier,
            payment.tier_requested,
            "payment_approval",
        );

        self.notifications
            .notify_payment_approved(payment.user_id, payment.tier_requested)
            .await;

        self.payments
            .get_by_id(payment_id)
            .await?
            .ok_or(TholviError::PaymentNotFound { payment_id })
    }

    /// Reject a pending payment request. The reason is mandatory and is
    /// shown verbatim to the affected user. No tier mutation.
    pub async fn reject(
        &self,
        payment_id: Uuid,
        reviewer_id: Uuid,
        reason: &str,
    ) -> Result<PaymentRequest> {
        self.require_admin(reviewer_id).await?;

        if reason.trim().is_empty() {
            return Err(TholviError::Validation(
                "A rejection reason is required".to_string(),
            ));
        }

        let payment = self.load_pending(payment_id).await?;

        let review = ReviewFields {
            reviewed_by: reviewer_id,
            reviewed_at: Utc::now(),
            rejection_reason: Some(reason.trim().to_string()),
        };

        let won = self
            .payments
            .update_status(payment_id, PaymentStatus::Pending, PaymentStatus::Rejected, review)
            .await?;
        if !won {
            return Err(self.already_reviewed(payment_id).await);
        }

        log_payment_review(
            payment_id,
            reviewer_id,
            PaymentStatus::Rejected,
            Some(reason),
        );

        self.notifications
            .notify_payment_rejected(payment.user_id, reason)
            .await;

        self.payments
            .get_by_id(payment_id)
            .await?
            .ok_or(TholviError::PaymentNotFound { payment_id })
    }

    /// A user's own payment history, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PaymentRequest>> {
        debug!(user_id = %user_id, "Listing payment requests for user");
        self.payments.list_for_user(user_id).await
    }

    /// Admin review queue with owner identity joined at read time
    pub async fn list_for_admin(
        &self,
        admin_id: Uuid,
        filter: PaymentFilter,
    ) -> Result<Vec<AdminPaymentRow>> {
        self.require_admin(admin_id).await?;
        self.payments.list_for_admin(filter).await
    }

    async fn require_admin(&self, user_id: Uuid) -> Result<UserAccount> {
        let account = self
            .users
            .find_account(user_id)
            .await?
            .ok_or(TholviError::UserNotFound { user_id })?;

        if account.role != UserRole::Admin {
            return Err(TholviError::Forbidden(
                "Payment review requires the admin role".to_string(),
            ));
        }

        Ok(account)
    }

    async fn load_pending(&self, payment_id: Uuid) -> Result<PaymentRequest> {
        let payment = self
            .payments
            .get_by_id(payment_id)
            .await?
            .ok_or(TholviError::PaymentNotFound { payment_id })?;

        if payment.status != PaymentStatus::Pending {
            return Err(TholviError::AlreadyReviewed {
                payment_id,
                status: payment.status,
            });
        }

        Ok(payment)
    }

    /// Build the race-loser error from the row's current status
    async fn already_reviewed(&self, payment_id: Uuid) -> TholviError {
        match self.payments.get_by_id(payment_id).await {
            Ok(Some(payment)) => TholviError::AlreadyReviewed {
                payment_id,
                status: payment.status,
            },
            Ok(None) => TholviError::PaymentNotFound { payment_id },
            Err(e) => e,
        }
    }
}

//! Payment request model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::Tier;

/// Review status of a payment request.
///
/// Transitions are one-directional and terminal: `pending -> approved` or
/// `pending -> rejected`. There is no un-reject or re-review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tier_requested: Tier,
    /// Free-text reference supplied by the user. Never verified against a
    /// payment processor; it exists for the reviewing admin to check by hand.
    pub transaction_id: String,
    pub screenshot_url: Option<String>,
    pub notes: Option<String>,
    pub status: PaymentStatus,
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPaymentRequest {
    pub user_id: Uuid,
    pub tier_requested: Tier,
    pub transaction_id: String,
    pub screenshot_url: Option<String>,
    pub notes: Option<String>,
}

/// Review fields written on the transition out of `pending`
#[derive(Debug, Clone)]
pub struct ReviewFields {
    pub reviewed_by: Uuid,
    pub reviewed_at: DateTime<Utc>,
    pub rejection_reason: Option<String>,
}

/// Admin queue filter
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    /// None lists every status
    pub status: Option<PaymentStatus>,
    /// Case-insensitive substring match on transaction_id
    pub search: Option<String>,
}

/// A payment request joined with its owner's identity for the admin queue.
/// The join happens at read time; the two entities stay independently owned.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminPaymentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub user_display_name: String,
    pub tier_requested: Tier,
    pub transaction_id: String,
    pub screenshot_url: Option<String>,
    pub notes: Option<String>,
    pub status: PaymentStatus,
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

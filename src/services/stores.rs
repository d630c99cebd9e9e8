//! Collaborator interfaces for the hosted backend
//!
//! Services depend on these traits rather than on concrete repositories, so
//! the business rules can be exercised against in-memory fakes and the
//! storage technology stays swappable. The sqlx implementations live in
//! `crate::database::repositories`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    AdminPaymentRow, ContentItem, ContentKind, CreateNotificationRequest, CreateSectionRequest,
    CreateUserRequest, Notification, PaymentFilter, PaymentRequest, PaymentStatus, ReviewFields,
    Section, SubmitPaymentRequest, Tier, UpdateSectionRequest, UserAccount,
};
use crate::utils::errors::Result;

/// Read/write access to user accounts
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn create_account(&self, request: CreateUserRequest) -> Result<UserAccount>;
    async fn find_account(&self, user_id: Uuid) -> Result<Option<UserAccount>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>>;
    async fn get_tier(&self, user_id: Uuid) -> Result<Tier>;
    /// Unconditional tier write, used by payment approval and admin edits
    async fn set_tier(&self, user_id: Uuid, tier: Tier) -> Result<()>;
    async fn set_telegram_access(&self, user_id: Uuid, enabled: bool) -> Result<()>;
    async fn set_banned(&self, user_id: Uuid, banned: bool) -> Result<()>;
}

/// Persistence for payment requests
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn create(&self, request: SubmitPaymentRequest) -> Result<PaymentRequest>;
    async fn get_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentRequest>>;

    /// Conditional status transition: writes `to` and the review fields only
    /// if the row's current status is `from`. Returns false when the
    /// precondition failed, which is how a lost concurrent-review race is
    /// detected.
    async fn update_status(
        &self,
        payment_id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        review: ReviewFields,
    ) -> Result<bool>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PaymentRequest>>;
    async fn list_for_admin(&self, filter: PaymentFilter) -> Result<Vec<AdminPaymentRow>>;

    /// Highest approved tier per user, used by reconciliation as a tier floor
    async fn approved_tier_floors(&self) -> Result<Vec<(Uuid, Tier)>>;
}

/// Persistence for content items and their sections
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All items of a kind, drafts included, sorted created_at descending
    async fn list_items(&self, kind: ContentKind) -> Result<Vec<ContentItem>>;
    async fn get_item(&self, content_id: Uuid) -> Result<Option<ContentItem>>;

    async fn insert_section(&self, request: CreateSectionRequest, order_index: i32)
        -> Result<Section>;
    async fn get_section(&self, section_id: Uuid) -> Result<Option<Section>>;
    async fn update_section(
        &self,
        section_id: Uuid,
        request: UpdateSectionRequest,
    ) -> Result<Section>;
    async fn delete_section(&self, section_id: Uuid) -> Result<()>;

    /// Siblings ordered by (order_index, created_at, id)
    async fn list_sections(&self, parent_id: Uuid) -> Result<Vec<Section>>;
    /// Live count of the section collection, not the denormalized value
    async fn count_sections(&self, parent_id: Uuid) -> Result<i64>;

    async fn increment_section_count(&self, parent_id: Uuid) -> Result<()>;
    /// Floored at zero even when the stored count is already inconsistent
    async fn decrement_section_count(&self, parent_id: Uuid) -> Result<()>;
    /// Reconciliation repair write
    async fn set_section_count(&self, parent_id: Uuid, count: i32) -> Result<()>;
}

/// Persistence for user notifications
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, request: CreateNotificationRequest) -> Result<Notification>;
    async fn get_by_id(&self, notification_id: Uuid) -> Result<Option<Notification>>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>>;
    async fn mark_read(&self, notification_id: Uuid) -> Result<()>;
}

/// Object storage for screenshots and thumbnails. The core only ever holds
/// the returned public URL, never raw bytes.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;
}

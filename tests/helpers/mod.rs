//! Test helpers: in-memory fakes for the collaborator interfaces
//!
//! The fakes implement the same contracts the sqlx repositories do —
//! including the conditional payment-status update and the floored section
//! counter — so the services can be exercised without a database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use tholvitrader::config::Settings;
use tholvitrader::models::{
    AdminPaymentRow, ContentItem, ContentKind, CreateNotificationRequest, CreateSectionRequest,
    CreateUserRequest, Notification, PaymentFilter, PaymentRequest, PaymentStatus, ReviewFields,
    Section, SubmitPaymentRequest, Tier, UpdateSectionRequest, UserAccount, UserRole,
};
use tholvitrader::services::stores::{
    ContentStore, NotificationStore, PaymentStore, UserDirectory,
};
use tholvitrader::services::ServiceFactory;
use tholvitrader::utils::errors::{Result, TholviError};

/// Monotonic timestamps so creation order is unambiguous in assertions
fn next_timestamp(counter: &AtomicI64) -> DateTime<Utc> {
    let tick = counter.fetch_add(1, Ordering::SeqCst);
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(tick)
}

#[derive(Default)]
pub struct InMemoryDirectory {
    accounts: Mutex<HashMap<Uuid, UserAccount>>,
    clock: AtomicI64,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account directly with the given tier and role
    pub fn add_user(&self, tier: Tier, role: UserRole) -> Uuid {
        let id = Uuid::new_v4();
        let now = next_timestamp(&self.clock);
        let account = UserAccount {
            id,
            email: format!("{id}@example.com"),
            display_name: format!("user-{}", &id.to_string()[..8]),
            tier,
            role,
            telegram_username: None,
            telegram_access: false,
            is_banned: false,
            created_at: now,
            updated_at: now,
        };
        self.accounts.lock().unwrap().insert(id, account);
        id
    }

    pub fn set_banned_directly(&self, user_id: Uuid, banned: bool) {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&user_id) {
            account.is_banned = banned;
        }
    }

    /// Bypass the service layer, e.g. to simulate a lost tier write
    pub fn set_tier_directly(&self, user_id: Uuid, tier: Tier) {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&user_id) {
            account.tier = tier;
        }
    }

    pub fn tier_of(&self, user_id: Uuid) -> Tier {
        self.accounts.lock().unwrap()[&user_id].tier
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn create_account(&self, request: CreateUserRequest) -> Result<UserAccount> {
        let id = Uuid::new_v4();
        let now = next_timestamp(&self.clock);
        let account = UserAccount {
            id,
            email: request.email,
            display_name: request.display_name,
            tier: Tier::Free,
            role: UserRole::User,
            telegram_username: request.telegram_username,
            telegram_access: false,
            is_banned: false,
            created_at: now,
            updated_at: now,
        };
        self.accounts.lock().unwrap().insert(id, account.clone());
        Ok(account)
    }

    async fn find_account(&self, user_id: Uuid) -> Result<Option<UserAccount>> {
        Ok(self.accounts.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn get_tier(&self, user_id: Uuid) -> Result<Tier> {
        self.accounts
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|a| a.tier)
            .ok_or(TholviError::UserNotFound { user_id })
    }

    async fn set_tier(&self, user_id: Uuid, tier: Tier) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&user_id)
            .ok_or(TholviError::UserNotFound { user_id })?;
        account.tier = tier;
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn set_telegram_access(&self, user_id: Uuid, enabled: bool) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&user_id)
            .ok_or(TholviError::UserNotFound { user_id })?;
        account.telegram_access = enabled;
        Ok(())
    }

    async fn set_banned(&self, user_id: Uuid, banned: bool) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&user_id)
            .ok_or(TholviError::UserNotFound { user_id })?;
        account.is_banned = banned;
        Ok(())
    }
}

pub struct InMemoryPayments {
    payments: Mutex<HashMap<Uuid, PaymentRequest>>,
    directory: Arc<InMemoryDirectory>,
    clock: AtomicI64,
}

impl InMemoryPayments {
    pub fn new(directory: Arc<InMemoryDirectory>) -> Self {
        Self {
            payments: Mutex::new(HashMap::new()),
            directory,
            clock: AtomicI64::new(0),
        }
    }

    pub fn get(&self, payment_id: Uuid) -> Option<PaymentRequest> {
        self.payments.lock().unwrap().get(&payment_id).cloned()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPayments {
    async fn create(&self, request: SubmitPaymentRequest) -> Result<PaymentRequest> {
        let payment = PaymentRequest {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            tier_requested: request.tier_requested,
            transaction_id: request.transaction_id,
            screenshot_url: request.screenshot_url,
            notes: request.notes,
            status: PaymentStatus::Pending,
            rejection_reason: None,
            reviewed_at: None,
            reviewed_by: None,
            created_at: next_timestamp(&self.clock),
        };
        self.payments
            .lock()
            .unwrap()
            .insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn get_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentRequest>> {
        Ok(self.payments.lock().unwrap().get(&payment_id).cloned())
    }

    async fn update_status(
        &self,
        payment_id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        review: ReviewFields,
    ) -> Result<bool> {
        let mut payments = self.payments.lock().unwrap();
        match payments.get_mut(&payment_id) {
            Some(payment) if payment.status == from => {
                payment.status = to;
                payment.reviewed_at = Some(review.reviewed_at);
                payment.reviewed_by = Some(review.reviewed_by);
                payment.rejection_reason = review.rejection_reason;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PaymentRequest>> {
        let mut rows: Vec<_> = self
            .payments
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_for_admin(&self, filter: PaymentFilter) -> Result<Vec<AdminPaymentRow>> {
        let search = filter.search.map(|s| s.to_lowercase());
        let mut rows: Vec<AdminPaymentRow> = self
            .payments
            .lock()
            .unwrap()
            .values()
            .filter(|p| filter.status.map_or(true, |s| p.status == s))
            .filter(|p| {
                search
                    .as_deref()
                    .map_or(true, |s| p.transaction_id.to_lowercase().contains(s))
            })
            .map(|p| {
                let owner = self
                    .directory
                    .accounts
                    .lock()
                    .unwrap()
                    .get(&p.user_id)
                    .cloned()
                    .expect("payment owner must exist");
                AdminPaymentRow {
                    id: p.id,
                    user_id: p.user_id,
                    user_email: owner.email,
                    user_display_name: owner.display_name,
                    tier_requested: p.tier_requested,
                    transaction_id: p.transaction_id.clone(),
                    screenshot_url: p.screenshot_url.clone(),
                    notes: p.notes.clone(),
                    status: p.status,
                    rejection_reason: p.rejection_reason.clone(),
                    reviewed_at: p.reviewed_at,
                    reviewed_by: p.reviewed_by,
                    created_at: p.created_at,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn approved_tier_floors(&self) -> Result<Vec<(Uuid, Tier)>> {
        let mut floors: HashMap<Uuid, Tier> = HashMap::new();
        for payment in self.payments.lock().unwrap().values() {
            if payment.status == PaymentStatus::Approved {
                floors
                    .entry(payment.user_id)
                    .and_modify(|t| *t = (*t).max(payment.tier_requested))
                    .or_insert(payment.tier_requested);
            }
        }
        Ok(floors.into_iter().collect())
    }
}

#[derive(Default)]
pub struct InMemoryContent {
    items: Mutex<HashMap<Uuid, ContentItem>>,
    sections: Mutex<HashMap<Uuid, Section>>,
    pub fail_listing: AtomicBool,
    clock: AtomicI64,
}

impl InMemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&self, kind: ContentKind, tier: Tier, published: bool) -> Uuid {
        self.add_item_with_body(kind, tier, published, None)
    }

    pub fn add_item_with_body(
        &self,
        kind: ContentKind,
        tier: Tier,
        published: bool,
        body: Option<&str>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let now = next_timestamp(&self.clock);
        let item = ContentItem {
            id,
            kind,
            title: format!("item-{}", &id.to_string()[..8]),
            description: Some("test item".to_string()),
            body: body.map(|b| b.to_string()),
            tier_required: tier,
            published,
            thumbnail_url: None,
            section_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.items.lock().unwrap().insert(id, item);
        id
    }

    pub fn stored_section_count(&self, parent_id: Uuid) -> i32 {
        self.items.lock().unwrap()[&parent_id].section_count
    }

    /// Force the denormalized counter out of sync with the live sections
    pub fn set_section_count_directly(&self, parent_id: Uuid, count: i32) {
        if let Some(item) = self.items.lock().unwrap().get_mut(&parent_id) {
            item.section_count = count;
        }
    }
}

#[async_trait]
impl ContentStore for InMemoryContent {
    async fn list_items(&self, kind: ContentKind) -> Result<Vec<ContentItem>> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(TholviError::Timeout("content store".to_string()));
        }
        let mut items: Vec<_> = self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.kind == kind)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn get_item(&self, content_id: Uuid) -> Result<Option<ContentItem>> {
        Ok(self.items.lock().unwrap().get(&content_id).cloned())
    }

    async fn insert_section(
        &self,
        request: CreateSectionRequest,
        order_index: i32,
    ) -> Result<Section> {
        let now = next_timestamp(&self.clock);
        let section = Section {
            id: Uuid::new_v4(),
            parent_id: request.parent_id,
            title: request.title,
            body: request.body,
            video_url: request.video_url,
            order_index,
            created_at: now,
            updated_at: now,
        };
        self.sections
            .lock()
            .unwrap()
            .insert(section.id, section.clone());
        Ok(section)
    }

    async fn get_section(&self, section_id: Uuid) -> Result<Option<Section>> {
        Ok(self.sections.lock().unwrap().get(&section_id).cloned())
    }

    async fn update_section(
        &self,
        section_id: Uuid,
        request: UpdateSectionRequest,
    ) -> Result<Section> {
        let mut sections = self.sections.lock().unwrap();
        let section = sections
            .get_mut(&section_id)
            .ok_or(TholviError::SectionNotFound { section_id })?;
        if let Some(title) = request.title {
            section.title = title;
        }
        if let Some(body) = request.body {
            section.body = Some(body);
        }
        if let Some(video_url) = request.video_url {
            section.video_url = Some(video_url);
        }
        if let Some(order_index) = request.order_index {
            section.order_index = order_index;
        }
        section.updated_at = Utc::now();
        Ok(section.clone())
    }

    async fn delete_section(&self, section_id: Uuid) -> Result<()> {
        self.sections
            .lock()
            .unwrap()
            .remove(&section_id)
            .map(|_| ())
            .ok_or(TholviError::SectionNotFound { section_id })
    }

    async fn list_sections(&self, parent_id: Uuid) -> Result<Vec<Section>> {
        let mut sections: Vec<_> = self
            .sections
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.parent_id == parent_id)
            .cloned()
            .collect();
        sections.sort_by(|a, b| {
            (a.order_index, a.created_at, a.id).cmp(&(b.order_index, b.created_at, b.id))
        });
        Ok(sections)
    }

    async fn count_sections(&self, parent_id: Uuid) -> Result<i64> {
        Ok(self
            .sections
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.parent_id == parent_id)
            .count() as i64)
    }

    async fn increment_section_count(&self, parent_id: Uuid) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .get_mut(&parent_id)
            .ok_or(TholviError::ContentNotFound {
                content_id: parent_id,
            })?;
        item.section_count += 1;
        Ok(())
    }

    async fn decrement_section_count(&self, parent_id: Uuid) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .get_mut(&parent_id)
            .ok_or(TholviError::ContentNotFound {
                content_id: parent_id,
            })?;
        item.section_count = (item.section_count - 1).max(0);
        Ok(())
    }

    async fn set_section_count(&self, parent_id: Uuid, count: i32) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .get_mut(&parent_id)
            .ok_or(TholviError::ContentNotFound {
                content_id: parent_id,
            })?;
        item.section_count = count;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryNotifications {
    notifications: Mutex<HashMap<Uuid, Notification>>,
    clock: AtomicI64,
}

impl InMemoryNotifications {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotifications {
    async fn create(&self, request: CreateNotificationRequest) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            title: request.title,
            message: request.message,
            kind: request.kind,
            read: false,
            created_at: next_timestamp(&self.clock),
        };
        self.notifications
            .lock()
            .unwrap()
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn get_by_id(&self, notification_id: Uuid) -> Result<Option<Notification>> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .get(&notification_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let mut rows: Vec<_> = self
            .notifications
            .lock()
            .unwrap()
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn mark_read(&self, notification_id: Uuid) -> Result<()> {
        let mut notifications = self.notifications.lock().unwrap();
        let notification = notifications
            .get_mut(&notification_id)
            .ok_or(TholviError::NotificationNotFound { notification_id })?;
        notification.read = true;
        Ok(())
    }
}

/// Everything a service test needs: the fakes plus the wired services
pub struct TestEnv {
    pub directory: Arc<InMemoryDirectory>,
    pub payments: Arc<InMemoryPayments>,
    pub content: Arc<InMemoryContent>,
    pub notifications: Arc<InMemoryNotifications>,
    pub services: ServiceFactory,
}

impl TestEnv {
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let payments = Arc::new(InMemoryPayments::new(directory.clone()));
        let content = Arc::new(InMemoryContent::new());
        let notifications = Arc::new(InMemoryNotifications::new());

        let mut settings = Settings::default();
        settings.storage.api_key = "test-key".to_string();

        let services = ServiceFactory::new(
            &settings,
            directory.clone(),
            payments.clone(),
            content.clone(),
            notifications.clone(),
        )
        .expect("service factory");

        Self {
            directory,
            payments,
            content,
            notifications,
            services,
        }
    }

    pub fn submit_request(&self, user_id: Uuid, tier: Tier, transaction_id: &str) -> SubmitPaymentRequest {
        SubmitPaymentRequest {
            user_id,
            tier_requested: tier,
            transaction_id: transaction_id.to_string(),
            screenshot_url: None,
            notes: None,
        }
    }
}

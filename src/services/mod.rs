//! Services module
//!
//! This module contains business logic services. Each service receives its
//! collaborators explicitly; there is no ambient singleton state.

pub mod catalog;
pub mod files;
pub mod notification;
pub mod payment;
pub mod reconcile;
pub mod sections;
pub mod stores;
pub mod user;

// Re-export commonly used services
pub use catalog::{Audience, CatalogService};
pub use files::HttpFileStore;
pub use notification::NotificationService;
pub use payment::PaymentService;
pub use reconcile::{ReconcileReport, ReconcileService};
pub use sections::SectionService;
pub use stores::{ContentStore, FileStore, NotificationStore, PaymentStore, UserDirectory};
pub use user::AccountService;

use std::sync::Arc;

use crate::config::Settings;
use crate::utils::errors::Result;

/// Service factory wiring every service from its collaborator interfaces
#[derive(Clone)]
pub struct ServiceFactory {
    pub account_service: AccountService,
    pub payment_service: PaymentService,
    pub catalog_service: CatalogService,
    pub section_service: SectionService,
    pub notification_service: NotificationService,
    pub reconcile_service: ReconcileService,
}

impl ServiceFactory {
    pub fn new(
        settings: &Settings,
        users: Arc<dyn UserDirectory>,
        payments: Arc<dyn PaymentStore>,
        content: Arc<dyn ContentStore>,
        notifications: Arc<dyn NotificationStore>,
    ) -> Result<Self> {
        let notification_service =
            NotificationService::new(notifications, settings.features.notifications);
        let account_service = AccountService::new(users.clone());
        let payment_service = PaymentService::new(
            payments.clone(),
            users.clone(),
            notification_service.clone(),
        );
        let catalog_service = CatalogService::new(content.clone());
        let section_service = SectionService::new(content.clone());
        let reconcile_service = ReconcileService::new(content, payments, users);

        Ok(Self {
            account_service,
            payment_service,
            catalog_service,
            section_service,
            notification_service,
            reconcile_service,
        })
    }
}

//! Reconciliation service
//!
//! The section counter and the payment-approval tier upgrade are each two
//! separate writes against the hosted store, so a partial failure can leave
//! a parent's denormalized count diverged from its live sections, or a user
//! under-provisioned relative to an approved payment. This job detects both
//! and repairs them. It only ever raises tiers: an approved payment is a
//! floor, and manual admin downgrades above that floor are preserved.

use std::sync::Arc;

use tracing::{info, warn};

use crate::models::ContentKind;
use crate::services::stores::{ContentStore, PaymentStore, UserDirectory};
use crate::utils::errors::Result;
use crate::utils::logging::log_drift_repair;

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub section_counts_repaired: usize,
    pub tiers_repaired: usize,
}

#[derive(Clone)]
pub struct ReconcileService {
    content: Arc<dyn ContentStore>,
    payments: Arc<dyn PaymentStore>,
    users: Arc<dyn UserDirectory>,
}

impl ReconcileService {
    pub fn new(
        content: Arc<dyn ContentStore>,
        payments: Arc<dyn PaymentStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            content,
            payments,
            users,
        }
    }

    /// Run both repair passes once
    pub async fn run_once(&self) -> Result<ReconcileReport> {
        let report = ReconcileReport {
            section_counts_repaired: self.repair_section_counts().await?,
            tiers_repaired: self.repair_user_tiers().await?,
        };

        if report == ReconcileReport::default() {
            info!("Reconciliation pass found no drift");
        } else {
            info!(
                section_counts = report.section_counts_repaired,
                tiers = report.tiers_repaired,
                "Reconciliation pass repaired drift"
            );
        }

        Ok(report)
    }

    /// Rewrite denormalized section counts that diverged from the live
    /// section collection
    pub async fn repair_section_counts(&self) -> Result<usize> {
        let mut repaired = 0;

        for kind in [ContentKind::Course, ContentKind::Tool] {
            for item in self.content.list_items(kind).await? {
                let live = self.content.count_sections(item.id).await?;
                if live != i64::from(item.section_count) {
                    log_drift_repair("content_item", item.id, i64::from(item.section_count), live);
                    self.content.set_section_count(item.id, live as i32).await?;
                    repaired += 1;
                }
            }
        }

        Ok(repaired)
    }

    /// Raise users whose tier fell below their approved-payment floor
    pub async fn repair_user_tiers(&self) -> Result<usize> {
        let mut repaired = 0;

        for (user_id, floor) in self.payments.approved_tier_floors().await? {
            let current = self.users.get_tier(user_id).await?;
            if current < floor {
                warn!(
                    user_id = %user_id,
                    current = %current,
                    floor = %floor,
                    "User tier below approved-payment floor, raising"
                );
                self.users.set_tier(user_id, floor).await?;
                repaired += 1;
            }
        }

        Ok(repaired)
    }
}

//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! helpers for the TholviTrader service.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::LoggingConfig;
use crate::models::{PaymentStatus, Tier};
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "tholvitrader.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log a payment review decision with structured data
pub fn log_payment_review(
    payment_id: Uuid,
    reviewer_id: Uuid,
    outcome: PaymentStatus,
    reason: Option<&str>,
) {
    info!(
        payment_id = %payment_id,
        reviewer_id = %reviewer_id,
        outcome = %outcome,
        reason = reason,
        "Payment request reviewed"
    );
}

/// Log a user tier change
pub fn log_tier_change(user_id: Uuid, from: Tier, to: Tier, source: &str) {
    info!(
        user_id = %user_id,
        from = %from,
        to = %to,
        source = source,
        "User tier changed"
    );
}

/// Log detected drift between denormalized state and the live collection
pub fn log_drift_repair(entity: &str, id: Uuid, stored: i64, actual: i64) {
    warn!(
        entity = entity,
        id = %id,
        stored = stored,
        actual = actual,
        "Denormalized value diverged from live data, repairing"
    );
}

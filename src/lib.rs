//! TholviTrader core
//!
//! Domain core of a tiered-membership content platform: tier-based access
//! gating, content catalog filtering, section ordering under courses and
//! tools, and the manual payment-review lifecycle that grants tiers.
//! Storage, authentication and file hosting are external collaborators
//! reached through the interfaces in [`services::stores`].

pub mod config;
pub mod database;
pub mod domain;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ErrorKind, Result, TholviError};

// Re-export main components for easy access
pub use models::{PaymentStatus, Tier};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}

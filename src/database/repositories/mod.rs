//! Database repositories module
//!
//! This module contains the sqlx implementations of the collaborator
//! interfaces defined in `crate::services::stores`.

pub mod content;
pub mod notification;
pub mod payment;
pub mod user;

// Re-export repositories
pub use content::ContentRepository;
pub use notification::NotificationRepository;
pub use payment::PaymentRepository;
pub use user::UserRepository;

//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod content;
pub mod notification;
pub mod payment;
pub mod user;

// Re-export commonly used models
pub use content::{
    ContentDetail, ContentItem, ContentKind, CreateContentRequest, CreateSectionRequest, Section,
    UpdateContentRequest, UpdateSectionRequest,
};
pub use notification::{CreateNotificationRequest, Notification};
pub use payment::{
    AdminPaymentRow, PaymentFilter, PaymentRequest, PaymentStatus, ReviewFields,
    SubmitPaymentRequest,
};
pub use user::{CreateUserRequest, Tier, UserAccount, UserRole};

//! Error handling for TholviTrader
//!
//! This module defines the main error type used throughout the application
//! and the error-kind taxonomy callers branch on when deciding how to
//! surface a failure.

use thiserror::Error;
use uuid::Uuid;

use crate::models::PaymentStatus;

/// Main error type for TholviTrader operations
#[derive(Error, Debug)]
pub enum TholviError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Payment {payment_id} is already {status}, not pending")]
    AlreadyReviewed {
        payment_id: Uuid,
        status: PaymentStatus,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: Uuid },

    #[error("Payment request not found: {payment_id}")]
    PaymentNotFound { payment_id: Uuid },

    #[error("Content item not found: {content_id}")]
    ContentNotFound { content_id: Uuid },

    #[error("Section not found: {section_id}")]
    SectionNotFound { section_id: Uuid },

    #[error("Notification not found: {notification_id}")]
    NotificationNotFound { notification_id: Uuid },
}

/// Result type alias for TholviTrader operations
pub type Result<T> = std::result::Result<T, TholviError>;

/// The five error kinds the UI layer distinguishes between.
///
/// `PreconditionFailed` is deliberately separate from `Validation` so a
/// review screen can say "already reviewed" instead of "bad input".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input at the domain boundary; user-correctable.
    Validation,
    /// State-machine violation, including the concurrent-review race.
    PreconditionFailed,
    /// A referenced id does not exist.
    NotFound,
    /// Caller lacks the role required for the operation.
    Forbidden,
    /// An external service failed or timed out.
    Dependency,
}

impl TholviError {
    /// Map this error to its taxonomy kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            TholviError::Validation(_) => ErrorKind::Validation,
            TholviError::AlreadyReviewed { .. } => ErrorKind::PreconditionFailed,
            TholviError::Forbidden(_) => ErrorKind::Forbidden,
            TholviError::UserNotFound { .. }
            | TholviError::PaymentNotFound { .. }
            | TholviError::ContentNotFound { .. }
            | TholviError::SectionNotFound { .. }
            | TholviError::NotificationNotFound { .. } => ErrorKind::NotFound,
            TholviError::Database(_)
            | TholviError::Migration(_)
            | TholviError::Http(_)
            | TholviError::Timeout(_)
            | TholviError::Storage(_)
            | TholviError::Config(_)
            | TholviError::Serialization(_)
            | TholviError::Io(_)
            | TholviError::UrlParse(_) => ErrorKind::Dependency,
        }
    }

    /// Whether a caller may retry after re-reading state.
    ///
    /// Domain failures are never retryable; dependency failures are, but
    /// the retry is a caller decision — no operation in this crate retries
    /// itself, because ids are store-generated and blind re-submission is
    /// not idempotent.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TholviError::Database(_)
                | TholviError::Http(_)
                | TholviError::Timeout(_)
                | TholviError::Storage(_)
                | TholviError::Io(_)
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::PreconditionFailed => write!(f, "precondition_failed"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Forbidden => write!(f, "forbidden"),
            ErrorKind::Dependency => write!(f, "dependency"),
        }
    }
}

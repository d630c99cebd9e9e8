//! Utility modules
//!
//! This module contains error handling and logging utilities

pub mod errors;
pub mod logging;

pub use errors::{ErrorKind, Result, TholviError};

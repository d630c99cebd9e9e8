//! Pure domain logic
//!
//! Decision functions with no I/O: the tier access policy and the content
//! catalog filters. Services wrap these with storage access.

pub mod catalog;
pub mod tier;

//! Utility functions.
//!
//! This module provides:
//! - Error message sanitization and credential redaction
//! - Duration helpers for response timing

pub mod sanitize;
mod timing;

pub use sanitize::{redact_secrets, sanitize_and_truncate_error_message, sanitize_error_message};
pub use timing::duration_to_ms;

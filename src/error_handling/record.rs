//! Timestamped error records kept by components for metrics reporting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::RwLock;

/// The most recent error observed by a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastError {
    /// When the error was recorded.
    pub timestamp: DateTime<Utc>,
    /// Sanitized error message.
    pub message: String,
}

impl LastError {
    /// Creates a record stamped with the current time.
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
        }
    }
}

/// Slot holding the latest [`LastError`], shared across tasks.
#[derive(Debug, Default)]
pub struct LastErrorSlot(RwLock<Option<LastError>>);

impl LastErrorSlot {
    /// Replaces the stored record.
    pub fn record(&self, message: impl Into<String>) {
        let message = crate::utils::sanitize_and_truncate_error_message(&message.into());
        // A poisoned lock only means a writer panicked mid-assignment; the value is still usable
        let mut guard = self.0.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(LastError::now(message));
    }

    /// Returns a copy of the stored record, if any.
    pub fn get(&self) -> Option<LastError> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

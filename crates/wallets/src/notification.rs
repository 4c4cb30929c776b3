//! Outcome notifications handed to the UI layer.

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

/// Message keys resolved by the UI's localisation layer
pub mod keys {
    pub const TRANSACTION_SENT: &str = "notifications.success.transactionSent";
    pub const TRANSACTION_FAILED: &str = "notifications.failure.transactionFailed";
    pub const TRANSACTION_TIMED_OUT: &str = "notifications.failure.transactionTimeout";
    pub const TRANSACTION_INTERRUPTED: &str = "notifications.failure.transactionInterrupted";
    pub const INVALID_TRANSACTION: &str = "notifications.failure.invalidTransaction";
    pub const FEE_CALCULATION_FAILED: &str = "notifications.failure.feeCalculationFailure";
    pub const RECEIVED_BLOCKCHAIN_INFO: &str = "notifications.success.receivedBlockchainInfo";
    pub const BLOCKCHAIN_INFO_FAILURE: &str = "notifications.failure.blockchainInfoFailure";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Failure,
}

/// Outcome of the most recent asynchronous operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message_key: String,
    pub payload: Value,
}

impl Notification {
    pub fn success(message_key: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: NotificationKind::Success,
            message_key: message_key.into(),
            payload,
        }
    }

    pub fn failure(message_key: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: NotificationKind::Failure,
            message_key: message_key.into(),
            payload,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

/// Receives notifications for display
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// In-memory sink that records every notification it receives
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries.lock().last().cloned()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries.lock().push(notification);
    }
}

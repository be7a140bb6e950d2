//! Notification delivery stand-ins.
//!
//! Delivery never fails: a notifier is a sink that records or prints what
//! would have been sent.

use std::sync::Mutex;

use crate::alarm::{Alarm, Channel};

/// What gets delivered for one due alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub username: String,
    pub message: String,
    pub channel: Channel,
}

impl From<&Alarm> for Notification {
    fn from(alarm: &Alarm) -> Self {
        Self {
            username: alarm.username.clone(),
            message: alarm.message.clone(),
            channel: alarm.channel,
        }
    }
}

/// Every delivery backend implements this trait.
pub trait Notifier: Send + Sync {
    /// Unique identifier (e.g. "console", "memory").
    fn name(&self) -> &str;

    /// Deliver one notification.
    fn notify(&self, notification: &Notification);
}

/// Prints each notification to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    fn notify(&self, notification: &Notification) {
        tracing::info!(
            notifier = self.name(),
            username = %notification.username,
            channel = %notification.channel,
            "delivering notification"
        );
        println!(
            "Sending notification to {} via {}: '{}'",
            notification.username, notification.channel, notification.message
        );
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far, oldest first.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Notifier for MemoryNotifier {
    fn name(&self) -> &str {
        "memory"
    }

    fn notify(&self, notification: &Notification) {
        tracing::debug!(
            notifier = self.name(),
            username = %notification.username,
            "recording notification"
        );
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification.clone());
    }
}

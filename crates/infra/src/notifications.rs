//! Notification sinks.

use std::sync::Mutex;

use tracing::info;

use stocksense_availability::{AvailabilityNotification, NotificationSink};

/// Buffers notifications for inspection. The sink contract is
/// fire-and-forget, so a poisoned buffer lock drops the notification rather
/// than failing the refresh that emitted it.
#[derive(Default)]
pub struct RecordingNotificationSink {
    notifications: Mutex<Vec<AvailabilityNotification>>,
}

impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<AvailabilityNotification> {
        match self.notifications.lock() {
            Ok(mut notifications) => std::mem::take(&mut *notifications),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.notifications.lock().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn abstract_availability_changed(&self, notification: AvailabilityNotification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

/// Emits each notification as a structured log event.
#[derive(Default)]
pub struct LoggingNotificationSink;

impl NotificationSink for LoggingNotificationSink {
    fn abstract_availability_changed(&self, notification: AvailabilityNotification) {
        info!(
            event_id = %notification.event_id,
            abstract_availability_id = %notification.abstract_availability_id,
            occurred_at = %notification.occurred_at,
            "abstract availability changed"
        );
    }
}

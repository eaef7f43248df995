//! Toast notifications for form outcomes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Toast {
    pub fn new(level: ToastLevel, title: &str, message: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            title: title.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct ToastBroadcaster {
    sender: broadcast::Sender<Toast>,
}

impl ToastBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn send(&self, toast: Toast) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(toast);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    pub fn success(&self, title: &str, message: &str) {
        self.send(Toast::new(ToastLevel::Success, title, message));
    }

    pub fn error(&self, title: &str, message: &str) {
        self.send(Toast::new(ToastLevel::Error, title, message));
    }

    pub fn info(&self, title: &str, message: &str) {
        self.send(Toast::new(ToastLevel::Info, title, message));
    }
}

impl Default for ToastBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_levels() {
        let broadcaster = ToastBroadcaster::new(10);
        let mut receiver = broadcaster.subscribe();

        broadcaster.success("Saved", "Process log created");
        broadcaster.error("Failed", "Network down");

        let first = receiver.try_recv().unwrap();
        assert_eq!(first.level, ToastLevel::Success);
        assert_eq!(first.message, "Process log created");

        let second = receiver.try_recv().unwrap();
        assert_eq!(second.level, ToastLevel::Error);
        assert_ne!(first.id, second.id);
    }
}

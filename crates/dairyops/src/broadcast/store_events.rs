//! Resource store transition events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::entities::ResourceKind;
use crate::store::Operation;

/// Where an operation is in its lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationPhase {
    Pending,
    Fulfilled,
    Rejected,
    Cancelled,
}

impl std::fmt::Display for OperationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationPhase::Pending => write!(f, "pending"),
            OperationPhase::Fulfilled => write!(f, "fulfilled"),
            OperationPhase::Rejected => write!(f, "rejected"),
            OperationPhase::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreEvent {
    pub kind: ResourceKind,
    pub operation: Operation,
    pub phase: OperationPhase,
    /// Error message on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Id of the record involved, when the operation targets one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl StoreEvent {
    pub fn new(kind: ResourceKind, operation: Operation, phase: OperationPhase) -> Self {
        Self {
            kind,
            operation,
            phase,
            message: None,
            record_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_record(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }
}

#[derive(Clone)]
pub struct StoreEventBroadcaster {
    sender: broadcast::Sender<StoreEvent>,
}

impl StoreEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn send(&self, event: StoreEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}

impl Default for StoreEventBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcaster_send_receive() {
        let broadcaster = StoreEventBroadcaster::new(10);
        let mut receiver = broadcaster.subscribe();

        broadcaster.send(
            StoreEvent::new(ResourceKind::Silo, Operation::Delete, OperationPhase::Rejected)
                .with_message("Silo is in use")
                .with_record("s-1"),
        );

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.kind, ResourceKind::Silo);
        assert_eq!(event.phase, OperationPhase::Rejected);
        assert_eq!(event.message.as_deref(), Some("Silo is in use"));
        assert_eq!(event.record_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn test_send_without_receivers() {
        let broadcaster = StoreEventBroadcaster::default();
        broadcaster.send(StoreEvent::new(
            ResourceKind::Machine,
            Operation::Fetch,
            OperationPhase::Pending,
        ));
    }
}

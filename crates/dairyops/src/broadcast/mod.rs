//! Broadcasting modules for real-time event streaming.
//!
//! Store transitions and user notifications are published on tokio broadcast
//! channels so any front end can subscribe without the stores knowing about it.

pub mod store_events;
pub mod toast;

pub use store_events::{OperationPhase, StoreEvent, StoreEventBroadcaster};
pub use toast::{Toast, ToastBroadcaster, ToastLevel};

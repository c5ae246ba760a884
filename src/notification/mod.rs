//! Train event notification.
//!
//! - `TrainEvent`: delays, cancellations, arrivals and ticket lifecycle events
//! - `EventNotifier`: synchronous fan-out to subscribed listeners
//! - Listeners: logging, in-memory recording, async channel forwarding

mod events;
mod listeners;
mod notifier;

pub use events::{event_types, TrainEvent};
pub use listeners::{ChannelListener, LoggingListener, RecordingListener};
pub use notifier::{
    DeliveryFailure, DeliveryReport, EventNotifier, SubscriptionId, TrainEventListener,
};

use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use super::{TrainEvent, TrainEventListener};
use crate::event_sourcing::serialize_event;

// ============================================================================
// Built-in Listeners
// ============================================================================

/// Audit log: writes every event as a structured `tracing` record.
pub struct LoggingListener;

impl TrainEventListener for LoggingListener {
    fn name(&self) -> &str {
        "logging"
    }

    fn on_event(&self, event: &TrainEvent) -> anyhow::Result<()> {
        let payload = serialize_event(event)?;
        info!(
            target: "train_ticketing::audit",
            train_id = %event.train_id,
            event_type = %event.event_type,
            payload = %payload,
            "{}",
            event.message
        );
        Ok(())
    }
}

/// Keeps every received event in memory.
pub struct RecordingListener {
    name: String,
    events: Mutex<Vec<TrainEvent>>,
}

impl RecordingListener {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<TrainEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn event_types(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.event_type).collect()
    }
}

impl TrainEventListener for RecordingListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, event: &TrainEvent) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}

/// Hands events to an async consumer. Sending never blocks the publisher;
/// a dropped receiver shows up as a delivery failure.
pub struct ChannelListener {
    name: String,
    sender: UnboundedSender<TrainEvent>,
}

impl ChannelListener {
    pub fn new(name: impl Into<String>, sender: UnboundedSender<TrainEvent>) -> Self {
        Self {
            name: name.into(),
            sender,
        }
    }
}

impl TrainEventListener for ChannelListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, event: &TrainEvent) -> anyhow::Result<()> {
        self.sender
            .send(event.clone())
            .ok()
            .context("event channel closed")
    }
}

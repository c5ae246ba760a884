use serde::{de::DeserializeOwned, Serialize};
use anyhow::Result;

// ============================================================================
// Domain Event Trait
// ============================================================================

/// All events raised by an aggregate implement this trait.
pub trait DomainEvent: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Stable name of the concrete event, e.g. `TicketConfirmed`
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// Event Serialization Helpers
// ============================================================================

pub fn serialize_event<E: Serialize>(event: &E) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

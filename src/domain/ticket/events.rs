use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::event_sourcing::DomainEvent;
use super::catalog::TicketType;
use super::value_objects::{Route, TicketId};

// ============================================================================
// Ticket Events - Domain Events for the Ticket Aggregate
// ============================================================================

/// Union type for all ticket events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TicketEvent {
    Reserved(TicketReserved),
    Repriced(TicketRepriced),
    Confirmed(TicketConfirmed),
    Cancelled(TicketCancelled),
    Used(TicketUsed),
}

impl DomainEvent for TicketEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TicketEvent::Reserved(_) => "TicketReserved",
            TicketEvent::Repriced(_) => "TicketRepriced",
            TicketEvent::Confirmed(_) => "TicketConfirmed",
            TicketEvent::Cancelled(_) => "TicketCancelled",
            TicketEvent::Used(_) => "TicketUsed",
        }
    }
}

impl TicketEvent {
    /// Category used when the event is broadcast as a train event
    pub fn topic(&self) -> &'static str {
        match self {
            TicketEvent::Reserved(_) => "ticket.reserved",
            TicketEvent::Repriced(_) => "ticket.repriced",
            TicketEvent::Confirmed(_) => "ticket.confirmed",
            TicketEvent::Cancelled(_) => "ticket.cancelled",
            TicketEvent::Used(_) => "ticket.used",
        }
    }
}

// ============================================================================
// Individual Event Types
// ============================================================================

/// Ticket Reserved - Initial event in the ticket lifecycle
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TicketReserved {
    pub ticket_id: TicketId,
    pub customer_id: String,
    pub ticket_type: TicketType,
    pub route: Route,
    pub travel_date_time: DateTime<Utc>,
    pub distance_km: u32,
    pub base_price: f64,
    /// Base price was supplied rather than computed from distance
    pub fixed_fare: bool,
    pub created_at: DateTime<Utc>,
}

/// Ticket Repriced - A pricing pass set the final price
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TicketRepriced {
    pub final_price: f64,
    pub discount_trail: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TicketConfirmed {
    pub confirmed_at: DateTime<Utc>,
}

/// Ticket Cancelled - Lifecycle ended without travel
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TicketCancelled {
    pub reason: Option<String>,
    pub refund_amount: f64,
    pub cancelled_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TicketUsed {
    pub used_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::test_support::sample_ticket;
    use crate::event_sourcing::serialize_event;

    #[test]
    fn test_event_type_and_topic_per_variant() {
        let now = Utc::now();
        let cases = [
            (TicketEvent::Confirmed(TicketConfirmed { confirmed_at: now }), "TicketConfirmed", "ticket.confirmed"),
            (TicketEvent::Used(TicketUsed { used_at: now }), "TicketUsed", "ticket.used"),
            (
                TicketEvent::Repriced(TicketRepriced { final_price: 9.5, discount_trail: vec![] }),
                "TicketRepriced",
                "ticket.repriced",
            ),
        ];
        for (event, event_type, topic) in cases {
            assert_eq!(event.event_type(), event_type);
            assert_eq!(event.topic(), topic);
        }

        let ticket = sample_ticket();
        let reserved = &ticket.history()[0];
        assert_eq!(reserved.event_type(), "TicketReserved");
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let event = TicketEvent::Cancelled(TicketCancelled {
            reason: None,
            refund_amount: 12.0,
            cancelled_at: Utc::now(),
        });
        let json = serialize_event(&event).unwrap();
        assert!(json.starts_with(r#"{"type":"Cancelled","data":{"reason":null,"refund_amount":12.0"#));
    }
}

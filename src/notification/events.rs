use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ticket::{Ticket, TicketEvent};

/// Well-known categories. `event_type` is free-form; these are the ones the
/// crate itself raises or recognises.
pub mod event_types {
    pub const DELAY: &str = "train.delay";
    pub const CANCELLATION: &str = "train.cancellation";
    pub const ARRIVAL: &str = "train.arrival";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainEvent {
    pub train_id: String,
    pub event_type: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl TrainEvent {
    pub fn new(
        train_id: impl Into<String>,
        event_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            train_id: train_id.into(),
            event_type: event_type.into(),
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }

    pub fn delay(train_id: impl Into<String>, minutes: u32) -> Self {
        Self::new(train_id, event_types::DELAY, format!("Delayed by {minutes} min"))
    }

    pub fn cancellation(train_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(train_id, event_types::CANCELLATION, reason)
    }

    pub fn arrival(train_id: impl Into<String>, station: &str) -> Self {
        Self::new(train_id, event_types::ARRIVAL, format!("Arrived at {station}"))
    }

    /// Broadcast form of a ticket lifecycle event. The ticket id stands in
    /// for the train id.
    pub fn from_ticket_event(ticket: &Ticket, event: &TicketEvent) -> Self {
        let message = match event {
            TicketEvent::Reserved(e) => format!(
                "{} {} reserved for {} at {:.2}",
                e.ticket_type.label(),
                e.route,
                e.customer_id,
                e.base_price
            ),
            TicketEvent::Repriced(e) => format!(
                "Final price {:.2} ({} discounts)",
                e.final_price,
                e.discount_trail.len()
            ),
            TicketEvent::Confirmed(_) => format!("Ticket confirmed for {}", ticket.route()),
            TicketEvent::Cancelled(e) => match &e.reason {
                Some(reason) => format!("Ticket cancelled ({reason}), refund {:.2}", e.refund_amount),
                None => format!("Ticket cancelled, refund {:.2}", e.refund_amount),
            },
            TicketEvent::Used(_) => format!("Ticket used on {}", ticket.route()),
        };

        Self {
            train_id: ticket.id().to_string(),
            event_type: event.topic().to_string(),
            message,
            occurred_at: Utc::now(),
        }
    }

    pub fn is_lifecycle(&self) -> bool {
        self.event_type.starts_with("ticket.")
    }
}

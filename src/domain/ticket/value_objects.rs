use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::TicketType;
use super::errors::TicketError;

// ============================================================================
// Ticket Value Objects
// ============================================================================

/// Ticket identifier: `<type code>-<uuid v7>`, e.g. `FR-0192...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(pub String);

impl TicketId {
    /// Time-ordered and unique per call.
    pub fn generate(ticket_type: TicketType) -> Self {
        Self(format!("{}-{}", ticket_type.code(), Uuid::now_v7().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Origin and destination station names, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

impl Route {
    pub fn new(origin: &str, destination: &str) -> Result<Self, TicketError> {
        let origin = origin.trim();
        let destination = destination.trim();

        if origin.is_empty() {
            return Err(TicketError::InvalidRoute("origin is empty".to_string()));
        }
        if destination.is_empty() {
            return Err(TicketError::InvalidRoute("destination is empty".to_string()));
        }
        if origin.to_lowercase() == destination.to_lowercase() {
            return Err(TicketError::InvalidRoute(format!(
                "origin and destination are both {origin}"
            )));
        }

        Ok(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.destination)
    }
}

/// Round a price to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

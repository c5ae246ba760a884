use super::lifecycle::{LifecycleAction, TicketState};

// ============================================================================
// Ticket Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TicketError {
    #[error("Unknown ticket type: {0}")]
    UnknownTicketType(String),

    #[error("Invalid distance: {0} km (must be positive)")]
    InvalidDistance(u32),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Cannot {action} a ticket in state {state}")]
    InvalidTransition {
        state: TicketState,
        action: LifecycleAction,
    },

    #[error("Ticket in state {0} can no longer be repriced")]
    PricingClosed(TicketState),

    #[error("Aggregate not initialized")]
    NotInitialized,
}

/// How a request layer should surface an error to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input; the caller must correct the request
    Validation,
    /// Request conflicts with the ticket's current state
    Conflict,
    Internal,
}

impl TicketError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TicketError::UnknownTicketType(_)
            | TicketError::InvalidDistance(_)
            | TicketError::InvalidRoute(_)
            | TicketError::InvalidPrice(_) => ErrorCategory::Validation,
            TicketError::InvalidTransition { .. } | TicketError::PricingClosed(_) => {
                ErrorCategory::Conflict
            }
            TicketError::NotInitialized => ErrorCategory::Internal,
        }
    }
}

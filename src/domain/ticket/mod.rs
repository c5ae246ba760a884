// ============================================================================
// Ticket Domain - Business Logic for the Ticket Aggregate
// ============================================================================
//
// This module contains ALL Ticket-specific code:
// - Catalog (TicketType and its per-km rates)
// - Value objects (TicketId, Route)
// - Lifecycle (TicketState, transition table, RefundPolicy)
// - Events, Commands, Errors
// - Aggregate (Ticket)
// - Factory (TicketFactory, TicketRequest)
// - Command Handler (TicketCommandHandler)
//
// ============================================================================

pub mod catalog;
pub mod value_objects;
pub mod lifecycle;
pub mod events;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod factory;
pub mod command_handler;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export for convenience
pub use catalog::*;
pub use value_objects::*;
pub use lifecycle::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use factory::*;
pub use command_handler::*;

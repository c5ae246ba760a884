// ============================================================================
// Core - Generic Aggregate Abstractions
// ============================================================================
//
// No domain-specific code lives here (no Ticket, no pricing).
//
// ============================================================================

pub mod aggregate;
pub mod event;

pub use aggregate::Aggregate;
pub use event::{DomainEvent, serialize_event};

// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// - ticket: the Ticket aggregate, its lifecycle and creation
// - pricing: the discount rule chain applied to tickets
//
// The command handler hands resulting events to the notifier; nothing
// here knows how requests arrive.
//
// ============================================================================

pub mod ticket;
pub mod pricing;

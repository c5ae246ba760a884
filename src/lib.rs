// ============================================================================
// Train Ticketing - booking core
// ============================================================================
//
// - domain::ticket: catalog, Ticket aggregate, lifecycle, factory, handler
// - domain::pricing: discount rules and the pricing engine
// - notification: train event fan-out to listeners
// - event_sourcing: Aggregate and DomainEvent building blocks
//
// ============================================================================

pub mod config;
pub mod domain;
pub mod event_sourcing;
pub mod metrics;
pub mod notification;

pub use config::AppConfig;
pub use domain::pricing::{DiscountRule, PriceQuote, PricingEngine};
pub use domain::ticket::{
    Ticket, TicketCommandHandler, TicketError, TicketFactory, TicketRequest, TicketState,
    TicketType,
};
pub use metrics::Metrics;
pub use notification::{EventNotifier, TrainEvent, TrainEventListener};

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::pricing::{PriceQuote, PricingEngine};
use crate::event_sourcing::{Aggregate, DomainEvent};
use crate::metrics::Metrics;
use crate::notification::{DeliveryReport, EventNotifier, TrainEvent};

use super::aggregate::Ticket;
use super::commands::TicketCommand;
use super::errors::TicketError;
use super::events::TicketEvent;
use super::factory::{TicketFactory, TicketRequest};
use super::lifecycle::RefundPolicy;

// ============================================================================
// Ticket Command Handler
// ============================================================================
//
// Orchestrates: Request/Command → Ticket → Events → Notifier
//
// Events are broadcast only after the ticket has applied them. Listener
// failures end up in the delivery report and never undo a transition.
//
// ============================================================================

pub struct TicketCommandHandler {
    factory: TicketFactory,
    pricing: Arc<PricingEngine>,
    refunds: RefundPolicy,
    notifier: Arc<EventNotifier>,
    metrics: Arc<Metrics>,
}

impl TicketCommandHandler {
    pub fn new(
        pricing: Arc<PricingEngine>,
        refunds: RefundPolicy,
        notifier: Arc<EventNotifier>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            factory: TicketFactory::new(),
            pricing,
            refunds,
            notifier,
            metrics,
        }
    }

    pub fn from_config(config: &AppConfig, notifier: Arc<EventNotifier>, metrics: Arc<Metrics>) -> Self {
        let pricing = Arc::new(PricingEngine::new(config.pricing.rules.clone()));
        Self::new(pricing, config.refunds.clone(), notifier, metrics)
    }

    pub fn pricing(&self) -> &Arc<PricingEngine> {
        &self.pricing
    }

    pub fn notifier(&self) -> &Arc<EventNotifier> {
        &self.notifier
    }

    pub fn refunds(&self) -> &RefundPolicy {
        &self.refunds
    }

    /// Create a ticket from `request` and run the first pricing pass.
    /// Nothing is broadcast unless both steps succeed.
    pub fn reserve(&self, request: &TicketRequest) -> Result<Ticket, TicketError> {
        let mut ticket = self.factory.create_from_request(request).inspect_err(|e| {
            warn!(ticket_type = %request.ticket_type, error = %e, "Ticket request rejected");
        })?;

        let quote = self.pricing.compute_final_price(&ticket);
        ticket.execute(&reprice_command(&quote)).inspect_err(|e| {
            warn!(ticket_id = %ticket.id(), error = %e, "Initial pricing pass rejected");
        })?;

        self.metrics.record_ticket_created(ticket.ticket_type().name());
        self.record_quote(&quote);
        info!(
            ticket_id = %ticket.id(),
            ticket_type = ticket.ticket_type().name(),
            route = %ticket.route(),
            base_price = ticket.base_price(),
            final_price = ticket.final_price(),
            "Ticket reserved"
        );

        let events = ticket.history().to_vec();
        self.broadcast(&ticket, &events);
        Ok(ticket)
    }

    /// Run the current rule chain against `ticket` and store the result.
    pub fn price(&self, ticket: &mut Ticket) -> Result<PriceQuote, TicketError> {
        let quote = self.pricing.compute_final_price(ticket);
        self.execute(ticket, &reprice_command(&quote))?;
        self.record_quote(&quote);
        Ok(quote)
    }

    pub fn confirm(&self, ticket: &mut Ticket) -> Result<(), TicketError> {
        self.execute(ticket, &TicketCommand::Confirm).map(|_| ())
    }

    /// Cancel with the configured refund policy. Returns the refunded amount.
    pub fn cancel(&self, ticket: &mut Ticket, reason: Option<String>) -> Result<f64, TicketError> {
        let command = TicketCommand::Cancel {
            reason,
            refund_ratio: self.refunds.ratio_for(ticket.state()),
        };
        self.execute(ticket, &command)?;
        Ok(ticket.refund_amount().unwrap_or(0.0))
    }

    pub fn mark_used(&self, ticket: &mut Ticket) -> Result<(), TicketError> {
        self.execute(ticket, &TicketCommand::MarkUsed).map(|_| ())
    }

    pub fn publish_train_event(&self, event: &TrainEvent) -> DeliveryReport {
        self.notifier.publish(event)
    }

    /// Apply `command` to `ticket` and broadcast the resulting events
    pub fn execute(
        &self,
        ticket: &mut Ticket,
        command: &TicketCommand,
    ) -> Result<Vec<TicketEvent>, TicketError> {
        let from = ticket.state();

        let events = match ticket.execute(command) {
            Ok(events) => events,
            Err(err) => {
                if let Some(action) = command.action() {
                    self.metrics.record_rejected_transition(from.as_str(), action.as_str());
                }
                warn!(ticket_id = %ticket.id(), state = %from, error = %err, "Ticket command rejected");
                return Err(err);
            }
        };

        let to = ticket.state();
        if from != to {
            self.metrics.record_transition(from.as_str(), to.as_str());
            for event in &events {
                info!(
                    ticket_id = %ticket.id(),
                    event = event.event_type(),
                    from = %from,
                    to = %to,
                    "Ticket transitioned"
                );
            }
        }

        self.broadcast(ticket, &events);
        Ok(events)
    }

    fn record_quote(&self, quote: &PriceQuote) {
        self.metrics
            .record_pricing_pass(quote.price, quote.applied_rules.iter().map(String::as_str));
    }

    fn broadcast(&self, ticket: &Ticket, events: &[TicketEvent]) {
        for event in events {
            let report = self.notifier.publish(&TrainEvent::from_ticket_event(ticket, event));
            if !report.all_delivered() {
                warn!(
                    ticket_id = %ticket.id(),
                    event = event.event_type(),
                    topic = event.topic(),
                    failed = report.failed.len(),
                    "Ticket event not delivered to every listener"
                );
            }
        }
    }
}

fn reprice_command(quote: &PriceQuote) -> TicketCommand {
    TicketCommand::Reprice {
        final_price: quote.price,
        discount_trail: quote.trail.clone(),
    }
}

use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::event_sourcing::Aggregate;
use super::catalog::TicketType;
use super::commands::TicketCommand;
use super::errors::TicketError;
use super::events::*;
use super::lifecycle::{LifecycleAction, RefundPolicy, TicketState};
use super::value_objects::{round_cents, Route, TicketId};

// ============================================================================
// Ticket Aggregate - Domain Logic
// ============================================================================
//
// State only changes by applying events, and events only come out of
// `handle_command` after every rule has been checked. A rejected command
// therefore leaves the ticket exactly as it was.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticket {
    // Identity
    id: TicketId,
    version: u64,

    // Booking
    customer_id: String,
    ticket_type: TicketType,
    route: Route,
    travel_date_time: DateTime<Utc>,
    distance_km: u32,

    // Pricing
    base_price: f64,
    fixed_fare: bool,
    final_price: f64,
    discount_trail: Vec<String>,

    // Lifecycle
    state: TicketState,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
    used_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    cancellation_reason: Option<String>,
    refund_amount: Option<f64>,

    // Every applied event, oldest first
    history: Vec<TicketEvent>,
}

impl Ticket {
    pub fn id(&self) -> &TicketId { &self.id }
    pub fn customer_id(&self) -> &str { &self.customer_id }
    pub fn ticket_type(&self) -> TicketType { self.ticket_type }
    pub fn route(&self) -> &Route { &self.route }
    pub fn origin(&self) -> &str { &self.route.origin }
    pub fn destination(&self) -> &str { &self.route.destination }
    pub fn travel_date_time(&self) -> DateTime<Utc> { self.travel_date_time }
    pub fn distance_km(&self) -> u32 { self.distance_km }
    pub fn base_price(&self) -> f64 { self.base_price }
    pub fn is_fixed_fare(&self) -> bool { self.fixed_fare }
    pub fn final_price(&self) -> f64 { self.final_price }
    pub fn discount_trail(&self) -> &[String] { &self.discount_trail }
    pub fn state(&self) -> TicketState { self.state }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> { self.confirmed_at }
    pub fn used_at(&self) -> Option<DateTime<Utc>> { self.used_at }
    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> { self.cancelled_at }
    pub fn cancellation_reason(&self) -> Option<&str> { self.cancellation_reason.as_deref() }
    pub fn refund_amount(&self) -> Option<f64> { self.refund_amount }
    pub fn history(&self) -> &[TicketEvent] { &self.history }

    pub fn is_modifiable(&self) -> bool {
        self.state.is_modifiable()
    }

    pub fn allows_refund(&self) -> bool {
        self.state.allows_refund()
    }

    pub fn confirm(&mut self) -> Result<(), TicketError> {
        self.execute(&TicketCommand::Confirm).map(|_| ())
    }

    pub fn mark_used(&mut self) -> Result<(), TicketError> {
        self.execute(&TicketCommand::MarkUsed).map(|_| ())
    }

    /// Cancel the ticket, refunding according to `policy`. Returns the
    /// refunded amount.
    pub fn cancel(&mut self, reason: Option<String>, policy: &RefundPolicy) -> Result<f64, TicketError> {
        let command = TicketCommand::Cancel {
            reason,
            refund_ratio: policy.ratio_for(self.state),
        };
        self.execute(&command)?;
        Ok(self.refund_amount.unwrap_or(0.0))
    }

    pub fn reprice(&mut self, final_price: f64, discount_trail: Vec<String>) -> Result<(), TicketError> {
        self.execute(&TicketCommand::Reprice { final_price, discount_trail }).map(|_| ())
    }

    fn transition(&self, action: LifecycleAction) -> Result<TicketState, TicketError> {
        self.state.next(action)
    }
}

// ============================================================================
// Aggregate Trait Implementation
// ============================================================================

impl Aggregate for Ticket {
    type Event = TicketEvent;
    type Command = TicketCommand;
    type Error = TicketError;

    fn apply_first_event(event: &Self::Event) -> Result<Self, Self::Error> {
        match event {
            TicketEvent::Reserved(e) => Ok(Self {
                id: e.ticket_id.clone(),
                version: 1,
                customer_id: e.customer_id.clone(),
                ticket_type: e.ticket_type,
                route: e.route.clone(),
                travel_date_time: e.travel_date_time,
                distance_km: e.distance_km,
                base_price: e.base_price,
                fixed_fare: e.fixed_fare,
                final_price: e.base_price,
                discount_trail: Vec::new(),
                state: TicketState::Reserved,
                created_at: e.created_at,
                confirmed_at: None,
                used_at: None,
                cancelled_at: None,
                cancellation_reason: None,
                refund_amount: None,
                history: vec![event.clone()],
            }),
            _ => Err(TicketError::NotInitialized),
        }
    }

    fn apply_event(&mut self, event: &Self::Event) -> Result<(), Self::Error> {
        match event {
            TicketEvent::Reserved(_) => {
                // First event already applied
                return Ok(());
            }
            TicketEvent::Repriced(e) => {
                self.final_price = e.final_price;
                self.discount_trail = e.discount_trail.clone();
            }
            TicketEvent::Confirmed(e) => {
                self.state = TicketState::Confirmed;
                self.confirmed_at = Some(e.confirmed_at);
            }
            TicketEvent::Cancelled(e) => {
                self.state = TicketState::Cancelled;
                self.cancelled_at = Some(e.cancelled_at);
                self.cancellation_reason = e.reason.clone();
                self.refund_amount = Some(e.refund_amount);
            }
            TicketEvent::Used(e) => {
                self.state = TicketState::Used;
                self.used_at = Some(e.used_at);
            }
        }

        self.version += 1;
        self.history.push(event.clone());
        Ok(())
    }

    fn handle_command(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            TicketCommand::Confirm => {
                self.transition(LifecycleAction::Confirm)?;

                Ok(vec![TicketEvent::Confirmed(TicketConfirmed {
                    confirmed_at: Utc::now(),
                })])
            }

            TicketCommand::Cancel { reason, refund_ratio } => {
                self.transition(LifecycleAction::Cancel)?;

                let refund_amount = round_cents(self.final_price * refund_ratio.clamp(0.0, 1.0));
                Ok(vec![TicketEvent::Cancelled(TicketCancelled {
                    reason: reason.clone(),
                    refund_amount,
                    cancelled_at: Utc::now(),
                })])
            }

            TicketCommand::MarkUsed => {
                self.transition(LifecycleAction::MarkUsed)?;

                Ok(vec![TicketEvent::Used(TicketUsed { used_at: Utc::now() })])
            }

            TicketCommand::Reprice { final_price, discount_trail } => {
                if self.state.is_terminal() {
                    return Err(TicketError::PricingClosed(self.state));
                }
                if !final_price.is_finite() || *final_price < 0.0 {
                    return Err(TicketError::InvalidPrice(*final_price));
                }

                Ok(vec![TicketEvent::Repriced(TicketRepriced {
                    final_price: *final_price,
                    discount_trail: discount_trail.clone(),
                })])
            }
        }
    }

    fn aggregate_id(&self) -> &str {
        self.id.as_str()
    }

    fn version(&self) -> u64 {
        self.version
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

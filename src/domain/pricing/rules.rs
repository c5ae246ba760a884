use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::ticket::{round_cents, Ticket, TicketType};

// ============================================================================
// Discount Rules
// ============================================================================
//
// A rule is plain data: when it applies (`Condition`), what it does to the
// price (`Adjustment`) and the name shown in the discount trail. Rules hold
// no state and never look at each other.
//
// ============================================================================

/// Applicability predicate, evaluated against the ticket and the price
/// reached so far in the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    Always,
    MinDistance { km: u32 },
    TicketClass { ticket_type: TicketType },
    /// Departure on Saturday or Sunday (UTC)
    WeekendTravel,
    /// Departure hour in `[from, to)` UTC; wraps past midnight when `from > to`
    DepartureHours { from: u32, to: u32 },
    /// Booked at least `days` whole days before departure
    BookedInAdvance { days: i64 },
    /// Current price is at least `amount`
    MinPrice { amount: f64 },
    AllOf { conditions: Vec<Condition> },
}

impl Condition {
    pub fn is_met(&self, ticket: &Ticket, current_price: f64) -> bool {
        match self {
            Condition::Always => true,
            Condition::MinDistance { km } => ticket.distance_km() >= *km,
            Condition::TicketClass { ticket_type } => ticket.ticket_type() == *ticket_type,
            Condition::WeekendTravel => matches!(
                ticket.travel_date_time().weekday(),
                Weekday::Sat | Weekday::Sun
            ),
            Condition::DepartureHours { from, to } => {
                let hour = ticket.travel_date_time().hour();
                if from <= to {
                    (*from..*to).contains(&hour)
                } else {
                    hour >= *from || hour < *to
                }
            }
            Condition::BookedInAdvance { days } => {
                (ticket.travel_date_time() - ticket.created_at()).num_days() >= *days
            }
            Condition::MinPrice { amount } => current_price >= *amount,
            Condition::AllOf { conditions } => {
                conditions.iter().all(|c| c.is_met(ticket, current_price))
            }
        }
    }
}

/// Price transform. Results are rounded to cents, never negative and
/// always finite; an adjustment that would overflow leaves the price as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    PercentOff { percent: f64 },
    AmountOff { amount: f64 },
    Surcharge { percent: f64 },
}

impl Adjustment {
    pub fn apply(&self, price: f64) -> f64 {
        let adjusted = match self {
            Adjustment::PercentOff { percent } => price * (1.0 - percent / 100.0),
            Adjustment::AmountOff { amount } => price - amount,
            Adjustment::Surcharge { percent } => price * (1.0 + percent / 100.0),
        };
        let rounded = round_cents(adjusted.max(0.0));
        if adjusted.is_finite() && rounded.is_finite() {
            rounded
        } else {
            price
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRule {
    pub name: String,
    pub condition: Condition,
    pub adjustment: Adjustment,
}

impl DiscountRule {
    pub fn new(name: impl Into<String>, condition: Condition, adjustment: Adjustment) -> Self {
        Self {
            name: name.into(),
            condition,
            adjustment,
        }
    }

    pub fn percent_off(name: impl Into<String>, condition: Condition, percent: f64) -> Self {
        Self::new(name, condition, Adjustment::PercentOff { percent })
    }

    pub fn early_booking(days: i64, percent: f64) -> Self {
        Self::percent_off("Early booking", Condition::BookedInAdvance { days }, percent)
    }

    pub fn long_distance(km: u32, percent: f64) -> Self {
        Self::percent_off("Long distance", Condition::MinDistance { km }, percent)
    }

    pub fn weekend(percent: f64) -> Self {
        Self::percent_off("Weekend travel", Condition::WeekendTravel, percent)
    }

    pub fn off_peak(from: u32, to: u32, percent: f64) -> Self {
        Self::percent_off("Off-peak", Condition::DepartureHours { from, to }, percent)
    }

    /// Chain used when no configuration says otherwise
    pub fn default_chain() -> Vec<DiscountRule> {
        vec![
            Self::early_booking(30, 15.0),
            Self::long_distance(500, 10.0),
            Self::weekend(5.0),
        ]
    }

    pub fn is_applicable(&self, ticket: &Ticket, current_price: f64) -> bool {
        self.condition.is_met(ticket, current_price)
    }

    pub fn transform(&self, _ticket: &Ticket, current_price: f64) -> f64 {
        self.adjustment.apply(current_price)
    }

    /// Trail entry, e.g. `Long distance: -10.0% (108.00 -> 97.20)`.
    /// A rule firing on a zero price reports a 0% change.
    pub fn describe(&self, before: f64, after: f64) -> String {
        let delta = if before == 0.0 {
            0.0
        } else {
            (after - before) / before * 100.0
        };
        format!("{}: {:+.1}% ({:.2} -> {:.2})", self.name, delta, before, after)
    }
}

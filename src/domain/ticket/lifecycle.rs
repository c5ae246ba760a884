use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::TicketError;

// ============================================================================
// Ticket Lifecycle - States, Actions and the Transition Table
// ============================================================================
//
//   Reserved ──confirm──▶ Confirmed ──mark_used──▶ Used
//      │                      │
//      └──cancel──▶ Cancelled ◀──cancel──┘
//
// Used and Cancelled are terminal.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketState {
    Reserved,
    Confirmed,
    Used,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Confirm,
    Cancel,
    MarkUsed,
}

/// Every legal (state, action) pair and the state it leads to.
/// Pairs missing from this table are rejected.
pub const TRANSITIONS: &[(TicketState, LifecycleAction, TicketState)] = &[
    (TicketState::Reserved, LifecycleAction::Confirm, TicketState::Confirmed),
    (TicketState::Reserved, LifecycleAction::Cancel, TicketState::Cancelled),
    (TicketState::Confirmed, LifecycleAction::Cancel, TicketState::Cancelled),
    (TicketState::Confirmed, LifecycleAction::MarkUsed, TicketState::Used),
];

impl TicketState {
    pub const ALL: [TicketState; 4] = [
        TicketState::Reserved,
        TicketState::Confirmed,
        TicketState::Used,
        TicketState::Cancelled,
    ];

    /// Look up the state reached by `action`, or fail with `InvalidTransition`.
    pub fn next(self, action: LifecycleAction) -> Result<TicketState, TicketError> {
        TRANSITIONS
            .iter()
            .find(|(from, on, _)| *from == self && *on == action)
            .map(|(_, _, to)| *to)
            .ok_or(TicketError::InvalidTransition { state: self, action })
    }

    pub fn can(self, action: LifecycleAction) -> bool {
        self.next(action).is_ok()
    }

    /// Whether booking details (route, schedule) may still change
    pub fn is_modifiable(self) -> bool {
        matches!(self, TicketState::Reserved)
    }

    pub fn allows_refund(self) -> bool {
        matches!(self, TicketState::Reserved | TicketState::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TicketState::Used | TicketState::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TicketState::Reserved => "Reserved",
            TicketState::Confirmed => "Confirmed",
            TicketState::Used => "Used",
            TicketState::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LifecycleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleAction::Confirm => "confirm",
            LifecycleAction::Cancel => "cancel",
            LifecycleAction::MarkUsed => "mark used",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Refund Policy
// ============================================================================

/// Share of the paid price refunded when a ticket is cancelled, per state it
/// is cancelled from. Ratios are in `[0, 1]`; only refundable states have an
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefundPolicy {
    pub reserved: f64,
    pub confirmed: f64,
}

impl Default for RefundPolicy {
    fn default() -> Self {
        Self::full_refund()
    }
}

impl RefundPolicy {
    pub fn full_refund() -> Self {
        Self { reserved: 1.0, confirmed: 1.0 }
    }

    pub fn with_ratio(mut self, state: TicketState, ratio: f64) -> Self {
        match state {
            TicketState::Reserved => self.reserved = ratio,
            TicketState::Confirmed => self.confirmed = ratio,
            TicketState::Used | TicketState::Cancelled => {}
        }
        self
    }

    /// Ratio applied when cancelling from `state`; non-refundable states
    /// always yield 0.
    pub fn ratio_for(&self, state: TicketState) -> f64 {
        let ratio = match state {
            TicketState::Reserved => self.reserved,
            TicketState::Confirmed => self.confirmed,
            TicketState::Used | TicketState::Cancelled => 0.0,
        };
        ratio.clamp(0.0, 1.0)
    }

    pub fn entries(&self) -> [(TicketState, f64); 2] {
        [(TicketState::Reserved, self.reserved), (TicketState::Confirmed, self.confirmed)]
    }
}

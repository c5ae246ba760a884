use super::lifecycle::LifecycleAction;

// ============================================================================
// Ticket Commands - Represent caller intent
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TicketCommand {
    Confirm,
    Cancel {
        reason: Option<String>,
        /// Share of the final price refunded, resolved from the refund policy
        refund_ratio: f64,
    },
    MarkUsed,
    /// Record the outcome of a pricing pass
    Reprice {
        final_price: f64,
        discount_trail: Vec<String>,
    },
}

impl TicketCommand {
    /// The lifecycle action this command performs, if it changes state
    pub fn action(&self) -> Option<LifecycleAction> {
        match self {
            TicketCommand::Confirm => Some(LifecycleAction::Confirm),
            TicketCommand::Cancel { .. } => Some(LifecycleAction::Cancel),
            TicketCommand::MarkUsed => Some(LifecycleAction::MarkUsed),
            TicketCommand::Reprice { .. } => None,
        }
    }
}

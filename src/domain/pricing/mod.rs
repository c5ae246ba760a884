// ============================================================================
// Pricing Domain - Discount Rule Chain
// ============================================================================
//
// - Rules (DiscountRule, Condition, Adjustment)
// - Engine (PricingEngine, PriceQuote, apply_rules)
//
// ============================================================================

pub mod rules;
pub mod engine;

pub use rules::*;
pub use engine::*;

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::domain::ticket::Ticket;
use super::rules::DiscountRule;

// ============================================================================
// Pricing Engine
// ============================================================================
//
// Folds an ordered rule chain over a ticket's base price. Each applicable
// rule acts on the price left by the previous one, so discounts stack
// multiplicatively.
//
// The chain is stored as an immutable snapshot. Readers clone the `Arc`
// and price against it; reconfiguration swaps in a whole new snapshot, so a
// pass never sees a half-updated chain.
//
// ============================================================================

/// Outcome of one pricing pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base_price: f64,
    pub price: f64,
    /// One entry per rule that fired, in chain order
    pub trail: Vec<String>,
    /// Names of the rules that fired, parallel to `trail`
    pub applied_rules: Vec<String>,
}

/// Apply `rules` in order to `ticket`, starting from its base price.
pub fn apply_rules(rules: &[DiscountRule], ticket: &Ticket) -> PriceQuote {
    let base_price = ticket.base_price();
    let mut trail = Vec::new();
    let mut applied_rules = Vec::new();

    let price = rules.iter().fold(base_price, |current, rule| {
        if !rule.is_applicable(ticket, current) {
            return current;
        }
        let next = rule.transform(ticket, current);
        trail.push(rule.describe(current, next));
        applied_rules.push(rule.name.clone());
        next
    });

    PriceQuote { base_price, price, trail, applied_rules }
}

#[derive(Debug)]
pub struct PricingEngine {
    rules: RwLock<Arc<[DiscountRule]>>,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PricingEngine {
    pub fn new(rules: Vec<DiscountRule>) -> Self {
        Self {
            rules: RwLock::new(rules.into()),
        }
    }

    /// Current chain snapshot
    pub fn rules(&self) -> Arc<[DiscountRule]> {
        self.rules.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn replace_rules(&self, rules: Vec<DiscountRule>) {
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        *guard = rules.into();
        tracing::info!(rule_count = guard.len(), "Pricing rule chain replaced");
    }

    /// Append a rule at the end of the chain
    pub fn add_rule(&self, rule: DiscountRule) {
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        let mut rules = guard.to_vec();
        tracing::info!(rule = %rule.name, position = rules.len(), "Pricing rule added");
        rules.push(rule);
        *guard = rules.into();
    }

    pub fn compute_final_price(&self, ticket: &Ticket) -> PriceQuote {
        let rules = self.rules();
        let quote = apply_rules(&rules, ticket);

        tracing::debug!(
            ticket_id = %ticket.id(),
            base_price = quote.base_price,
            final_price = quote.price,
            applied = quote.trail.len(),
            "Pricing pass complete"
        );

        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::rules::{Adjustment, Condition};
    use crate::domain::ticket::test_support::*;
    use crate::domain::ticket::TicketType;

    fn ten_percent(name: &str) -> DiscountRule {
        DiscountRule::percent_off(name, Condition::Always, 10.0)
    }

    #[test]
    fn test_empty_chain_returns_base_price() {
        let ticket = sample_ticket();
        let quote = PricingEngine::default().compute_final_price(&ticket);

        assert_eq!(quote.price, ticket.base_price());
        assert!(quote.trail.is_empty());
    }

    #[test]
    fn test_discounts_stack_cumulatively() {
        let ticket = priced_ticket(100.0);
        let engine = PricingEngine::new(vec![ten_percent("R1"), ten_percent("R2")]);

        let quote = engine.compute_final_price(&ticket);
        assert_eq!(quote.price, 81.0);
        assert_eq!(
            quote.trail,
            vec![
                "R1: -10.0% (100.00 -> 90.00)".to_string(),
                "R2: -10.0% (90.00 -> 81.00)".to_string(),
            ]
        );
    }

    #[test]
    fn test_order_matters() {
        let ticket = priced_ticket(100.0);
        let voucher = DiscountRule::new("Voucher", Condition::Always, Adjustment::AmountOff { amount: 10.0 });

        let percent_first = apply_rules(&[ten_percent("Promo"), voucher.clone()], &ticket);
        let voucher_first = apply_rules(&[voucher, ten_percent("Promo")], &ticket);

        assert_eq!(percent_first.price, 80.0);
        assert_eq!(voucher_first.price, 81.0);
    }

    #[test]
    fn test_inapplicable_rule_is_skipped() {
        let ticket = priced_ticket(100.0);
        let never = DiscountRule::long_distance(10_000, 50.0);
        let quote = apply_rules(&[never, ten_percent("Promo")], &ticket);

        assert_eq!(quote.price, 90.0);
        assert_eq!(quote.applied_rules, vec!["Promo"]);
        assert!(!quote.trail[0].starts_with("Long distance"));
    }

    #[test]
    fn test_condition_sees_already_discounted_price() {
        let ticket = priced_ticket(100.0);
        let big_fare_bonus = DiscountRule::percent_off("Big fare", Condition::MinPrice { amount: 95.0 }, 5.0);

        let quote = apply_rules(&[ten_percent("Promo"), big_fare_bonus], &ticket);
        assert_eq!(quote.price, 90.0);
        assert_eq!(quote.trail.len(), 1);
    }

    #[test]
    fn test_price_increasing_rule_is_permitted() {
        let ticket = priced_ticket(50.0);
        let peak = DiscountRule::new("Peak hour", Condition::Always, Adjustment::Surcharge { percent: 20.0 });

        let quote = apply_rules(&[peak], &ticket);
        assert_eq!(quote.price, 60.0);
        assert_eq!(quote.trail, vec!["Peak hour: +20.0% (50.00 -> 60.00)".to_string()]);
    }

    #[test]
    fn test_rule_firing_on_zero_price() {
        let ticket = priced_ticket(5.0);
        let voucher = DiscountRule::new("Voucher", Condition::Always, Adjustment::AmountOff { amount: 5.0 });

        let quote = apply_rules(&[voucher, ten_percent("Promo")], &ticket);
        assert_eq!(quote.price, 0.0);
        assert_eq!(quote.trail[1], "Promo: +0.0% (0.00 -> 0.00)");
    }

    #[test]
    fn test_trail_resets_between_passes() {
        let ticket = priced_ticket(100.0);
        let engine = PricingEngine::new(vec![ten_percent("Promo")]);

        let first = engine.compute_final_price(&ticket);
        let second = engine.compute_final_price(&ticket);
        assert_eq!(first, second);
        assert_eq!(second.trail.len(), 1);
    }

    #[test]
    fn test_default_chain_on_sample_ticket() {
        // 600 km, booked 34 days ahead, Wednesday departure
        let ticket = sample_ticket();
        let quote = apply_rules(&DiscountRule::default_chain(), &ticket);

        // 108 -> 91.80 (early) -> 82.62 (long distance); no weekend discount
        assert_eq!(quote.price, 82.62);
        assert_eq!(quote.trail.len(), 2);
        assert!(quote.trail[0].starts_with("Early booking"));
        assert!(quote.trail[1].starts_with("Long distance"));
    }

    #[test]
    fn test_add_and_replace_rules() {
        let engine = PricingEngine::default();
        engine.add_rule(ten_percent("A"));
        engine.add_rule(ten_percent("B"));
        let names: Vec<_> = engine.rules().iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, vec!["A", "B"]);

        engine.replace_rules(vec![DiscountRule::weekend(5.0)]);
        assert_eq!(engine.rules().len(), 1);
    }

    #[test]
    fn test_concurrent_reconfiguration_is_never_observed_partially() {
        let engine = PricingEngine::new(vec![ten_percent("A")]);
        let ticket = reserved_ticket(TicketType::Regionale, 100, 100.0, weekday_departure(), booked_at());

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..200 {
                    if i % 2 == 0 {
                        engine.replace_rules(vec![ten_percent("A"), ten_percent("B")]);
                    } else {
                        engine.replace_rules(vec![ten_percent("A")]);
                    }
                }
            });

            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let quote = engine.compute_final_price(&ticket);
                        match quote.trail.len() {
                            1 => assert_eq!(quote.price, 90.0),
                            2 => assert_eq!(quote.price, 81.0),
                            n => panic!("unexpected trail length {n}"),
                        }
                    }
                });
            }
        });
    }
}

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// - Ticket creation by type
// - Lifecycle transitions (applied and rejected)
// - Pricing passes, applied discounts, final price distribution
// - Train event fan-out and listener failures
//
// Exposition is left to the embedding application via `registry()` or
// `render()`.
// ============================================================================

/// Central metrics registry for the ticketing core
pub struct Metrics {
    registry: Registry,

    // Ticket Metrics
    pub tickets_created: IntCounterVec,
    pub transitions: IntCounterVec,
    pub transitions_rejected: IntCounterVec,

    // Pricing Metrics
    pub pricing_passes: IntCounter,
    pub discounts_applied: IntCounterVec,
    pub final_price: Histogram,

    // Notification Metrics
    pub train_events_published: IntCounterVec,
    pub listener_failures: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // Ticket Metrics
        let tickets_created = IntCounterVec::new(
            Opts::new("tickets_created_total", "Total tickets created"),
            &["ticket_type"],
        )?;
        registry.register(Box::new(tickets_created.clone()))?;

        let transitions = IntCounterVec::new(
            Opts::new("ticket_transitions_total", "Ticket lifecycle transitions applied"),
            &["from", "to"],
        )?;
        registry.register(Box::new(transitions.clone()))?;

        let transitions_rejected = IntCounterVec::new(
            Opts::new("ticket_transitions_rejected_total", "Ticket lifecycle transitions rejected"),
            &["state", "action"],
        )?;
        registry.register(Box::new(transitions_rejected.clone()))?;

        // Pricing Metrics
        let pricing_passes = IntCounter::new("pricing_passes_total", "Total pricing passes")?;
        registry.register(Box::new(pricing_passes.clone()))?;

        let discounts_applied = IntCounterVec::new(
            Opts::new("discounts_applied_total", "Discount rules applied"),
            &["rule"],
        )?;
        registry.register(Box::new(discounts_applied.clone()))?;

        let final_price = Histogram::with_opts(
            HistogramOpts::new("ticket_final_price", "Final ticket price after discounts")
                .buckets(vec![5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0]),
        )?;
        registry.register(Box::new(final_price.clone()))?;

        // Notification Metrics
        let train_events_published = IntCounterVec::new(
            Opts::new("train_events_published_total", "Train events published"),
            &["event_type"],
        )?;
        registry.register(Box::new(train_events_published.clone()))?;

        let listener_failures = IntCounterVec::new(
            Opts::new("listener_failures_total", "Listener failures during event delivery"),
            &["listener"],
        )?;
        registry.register(Box::new(listener_failures.clone()))?;

        Ok(Self {
            registry,
            tickets_created,
            transitions,
            transitions_rejected,
            pricing_passes,
            discounts_applied,
            final_price,
            train_events_published,
            listener_failures,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Text exposition of every registered metric
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn record_ticket_created(&self, ticket_type: &str) {
        self.tickets_created.with_label_values(&[ticket_type]).inc();
    }

    pub fn record_transition(&self, from: &str, to: &str) {
        self.transitions.with_label_values(&[from, to]).inc();
    }

    pub fn record_rejected_transition(&self, state: &str, action: &str) {
        self.transitions_rejected.with_label_values(&[state, action]).inc();
    }

    /// Helper to record one pricing pass and the rules that fired in it
    pub fn record_pricing_pass<'a>(&self, final_price: f64, rules: impl IntoIterator<Item = &'a str>) {
        self.pricing_passes.inc();
        self.final_price.observe(final_price);
        for rule in rules {
            self.discounts_applied.with_label_values(&[rule]).inc();
        }
    }

    pub fn record_train_event(&self, event_type: &str) {
        self.train_events_published.with_label_values(&[event_type]).inc();
    }

    pub fn record_listener_failure(&self, listener: &str) {
        self.listener_failures.with_label_values(&[listener]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ticket_created() {
        let metrics = Metrics::new().unwrap();
        metrics.record_ticket_created("FRECCIA_ROSSA");
        metrics.record_ticket_created("FRECCIA_ROSSA");

        let gathered = metrics.registry.gather();
        let created = gathered.iter().find(|m| m.name() == "tickets_created_total").unwrap();
        assert_eq!(created.metric[0].counter.value, Some(2.0));
    }

    #[test]
    fn test_record_transitions() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transition("Reserved", "Confirmed");
        metrics.record_transition("Confirmed", "Cancelled");
        metrics.record_rejected_transition("Cancelled", "confirm");

        let gathered = metrics.registry.gather();
        let applied = gathered.iter().find(|m| m.name() == "ticket_transitions_total").unwrap();
        assert_eq!(applied.metric.len(), 2);
        let rejected = gathered
            .iter()
            .find(|m| m.name() == "ticket_transitions_rejected_total")
            .unwrap();
        assert_eq!(rejected.metric[0].counter.value, Some(1.0));
    }

    #[test]
    fn test_record_pricing_pass() {
        let metrics = Metrics::new().unwrap();
        metrics.record_pricing_pass(82.62, ["Early booking", "Long distance"]);

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("pricing_passes_total 1"));
        assert!(rendered.contains("discounts_applied_total{rule=\"Early booking\"} 1"));
        assert!(rendered.contains("ticket_final_price_count 1"));
    }
}

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use super::TrainEvent;
use crate::metrics::Metrics;

// ============================================================================
// Event Notifier - In-process publish/subscribe
// ============================================================================
//
// Delivery is synchronous and in subscription order. Inactive subscribers
// stay registered but are skipped. A listener that errors or panics is
// recorded in the report and delivery moves on to the next one.
//
// ============================================================================

pub trait TrainEventListener: Send + Sync {
    fn name(&self) -> &str;

    fn on_event(&self, event: &TrainEvent) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

#[derive(Clone)]
struct Subscription {
    id: SubscriptionId,
    listener: Arc<dyn TrainEventListener>,
    active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryFailure {
    pub subscription: SubscriptionId,
    pub listener: String,
    pub error: String,
}

/// What happened to one published event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Default)]
pub struct EventNotifier {
    subscriptions: RwLock<Vec<Subscription>>,
    next_id: AtomicU64,
    metrics: Option<Arc<Metrics>>,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: Arc<Metrics>) -> Self {
        Self {
            metrics: Some(metrics),
            ..Self::default()
        }
    }

    /// Register an active listener at the end of the delivery order
    pub fn subscribe(&self, listener: Arc<dyn TrainEventListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(subscription = %id, listener = listener.name(), "Listener subscribed");

        self.write().push(Subscription {
            id,
            listener,
            active: true,
        });
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        before != subscriptions.len()
    }

    pub fn activate(&self, id: SubscriptionId) -> bool {
        self.set_active(id, true)
    }

    pub fn deactivate(&self, id: SubscriptionId) -> bool {
        self.set_active(id, false)
    }

    pub fn is_active(&self, id: SubscriptionId) -> Option<bool> {
        self.read().iter().find(|s| s.id == id).map(|s| s.active)
    }

    pub fn subscriber_count(&self) -> usize {
        self.read().len()
    }

    pub fn publish(&self, event: &TrainEvent) -> DeliveryReport {
        // Deliver from a snapshot so listeners may (un)subscribe while handling
        let subscriptions = self.read().clone();
        let mut report = DeliveryReport::default();

        for subscription in &subscriptions {
            if !subscription.active {
                report.skipped += 1;
                continue;
            }

            let listener = &subscription.listener;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));

            let error = match outcome {
                Ok(Ok(())) => {
                    report.delivered += 1;
                    continue;
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => "listener panicked".to_string(),
            };

            warn!(
                subscription = %subscription.id,
                listener = listener.name(),
                event_type = %event.event_type,
                error = %error,
                "Listener failed to handle train event"
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_listener_failure(listener.name());
            }
            report.failed.push(DeliveryFailure {
                subscription: subscription.id,
                listener: listener.name().to_string(),
                error,
            });
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_train_event(&event.event_type);
        }
        debug!(
            event_type = %event.event_type,
            train_id = %event.train_id,
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Train event published"
        );

        report
    }

    fn set_active(&self, id: SubscriptionId, active: bool) -> bool {
        match self.write().iter_mut().find(|s| s.id == id) {
            Some(subscription) => {
                subscription.active = active;
                true
            }
            None => false,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Subscription>> {
        self.subscriptions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Subscription>> {
        self.subscriptions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use train_ticketing::notification::{ChannelListener, LoggingListener};
use train_ticketing::{
    AppConfig, EventNotifier, Metrics, TicketCommandHandler, TicketRequest, TrainEvent,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config path is the first argument; defaults otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(&path)?,
        None => AppConfig::default(),
    };

    // RUST_LOG wins over the configured filter
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!("🚆 Starting train ticketing demo");
    tracing::info!("💶 {} pricing rules loaded", config.pricing.rules.len());

    // === 1. Metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 2. Notifier with an audit log and an async dispatcher ===
    let notifier = Arc::new(EventNotifier::with_metrics(metrics.clone()));
    notifier.subscribe(Arc::new(LoggingListener));

    let (tx, mut rx) = mpsc::unbounded_channel::<TrainEvent>();
    notifier.subscribe(Arc::new(ChannelListener::new("dispatch", tx)));
    let dispatcher = tokio::spawn(async move {
        let mut received = 0usize;
        while let Some(event) = rx.recv().await {
            received += 1;
            tracing::debug!(event_type = %event.event_type, "Dispatched: {}", event.message);
        }
        received
    });

    // === 3. Ticket lifecycle ===
    let handler = TicketCommandHandler::from_config(&config, notifier.clone(), metrics.clone());

    let request = TicketRequest {
        ticket_type: "FRECCIA_ROSSA".to_string(),
        origin: "Roma".to_string(),
        destination: "Milano".to_string(),
        travel_date_time: Utc::now() + Duration::days(45),
        distance_km: 600,
        customer_id: "cust-001".to_string(),
        fixed_price: None,
    };

    let mut ticket = handler.reserve(&request)?;
    tracing::info!(
        "✅ Ticket {} reserved: base {:.2}, final {:.2}",
        ticket.id(),
        ticket.base_price(),
        ticket.final_price()
    );
    for line in ticket.discount_trail() {
        tracing::info!("   {}", line);
    }

    handler.confirm(&mut ticket)?;
    tracing::info!("✅ Ticket {} confirmed", ticket.id());

    let refund = handler.cancel(&mut ticket, Some("Change of plans".to_string()))?;
    tracing::info!("↩️  Ticket {} cancelled, refund {:.2}", ticket.id(), refund);

    if let Err(e) = handler.confirm(&mut ticket) {
        tracing::warn!("❌ Expected rejection: {}", e);
    }

    // === 4. Operational train events ===
    let report = handler.publish_train_event(&TrainEvent::delay("FR9612", 15));
    tracing::info!("📣 Delay delivered to {} listeners", report.delivered);

    // Dropping the notifier closes the dispatch channel
    drop(handler);
    drop(notifier);
    let dispatched = dispatcher.await?;
    tracing::info!("📬 Dispatcher handled {} events", dispatched);

    println!("{}", metrics.render()?);
    Ok(())
}

use chrono::{DateTime, TimeZone, Utc};

use crate::event_sourcing::Aggregate;
use super::aggregate::Ticket;
use super::catalog::TicketType;
use super::events::{TicketEvent, TicketReserved};
use super::value_objects::{round_cents, Route, TicketId};

// Booked on a Wednesday for a Wednesday morning departure 34 days later.
pub fn booked_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 10, 0, 0).unwrap()
}

pub fn weekday_departure() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 11, 18, 8, 30, 0).unwrap()
}

pub fn saturday_departure() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 11, 21, 8, 30, 0).unwrap()
}

pub fn reserved_ticket(
    ticket_type: TicketType,
    distance_km: u32,
    base_price: f64,
    travel_date_time: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> Ticket {
    let event = TicketEvent::Reserved(TicketReserved {
        ticket_id: TicketId::generate(ticket_type),
        customer_id: "cust-1".to_string(),
        ticket_type,
        route: Route::new("Roma", "Milano").unwrap(),
        travel_date_time,
        distance_km,
        base_price,
        fixed_fare: false,
        created_at,
    });
    Ticket::apply_first_event(&event).unwrap()
}

/// Frecciarossa Roma -> Milano, 600 km, 108.00
pub fn sample_ticket() -> Ticket {
    reserved_ticket(
        TicketType::FrecciaRossa,
        600,
        round_cents(600.0 * TicketType::FrecciaRossa.rate_per_km()),
        weekday_departure(),
        booked_at(),
    )
}

/// Ticket with an arbitrary base price, departing within a week of booking
pub fn priced_ticket(base_price: f64) -> Ticket {
    reserved_ticket(
        TicketType::Intercity,
        100,
        base_price,
        weekday_departure(),
        weekday_departure() - chrono::Duration::days(2),
    )
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event_sourcing::Aggregate;
use super::aggregate::Ticket;
use super::catalog::TicketType;
use super::errors::TicketError;
use super::events::{TicketEvent, TicketReserved};
use super::value_objects::{round_cents, Route, TicketId};

// ============================================================================
// Ticket Factory
// ============================================================================
//
// Validates a booking against the catalog and builds the first event of a
// new ticket. Every ticket it returns is in the Reserved state.
//
// ============================================================================

/// Creation request as supplied by a request-handling layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRequest {
    /// Canonical name or short code of the ticket type
    pub ticket_type: String,
    pub origin: String,
    pub destination: String,
    pub travel_date_time: DateTime<Utc>,
    #[serde(default)]
    pub distance_km: u32,
    pub customer_id: String,
    /// Flat fare; when present the distance is recorded but not used for
    /// the base price
    #[serde(default)]
    pub fixed_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TicketFactory;

impl TicketFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create a ticket priced at `distance_km * rate`.
    pub fn create(
        &self,
        ticket_type: &str,
        origin: &str,
        destination: &str,
        travel_date_time: DateTime<Utc>,
        distance_km: u32,
        customer_id: &str,
    ) -> Result<Ticket, TicketError> {
        let ticket_type = TicketType::resolve(ticket_type)?;
        if distance_km == 0 {
            return Err(TicketError::InvalidDistance(distance_km));
        }
        let route = Route::new(origin, destination)?;

        let base_price = round_cents(f64::from(distance_km) * ticket_type.rate_per_km());
        self.reserve(ticket_type, route, travel_date_time, distance_km, base_price, false, customer_id)
    }

    /// Create a ticket at a flat fare. The per-km formula is bypassed;
    /// `distance_km` is only recorded, and 0 means it is not known. Rules on
    /// distance see the recorded value.
    #[allow(clippy::too_many_arguments)]
    pub fn create_with_fixed_price(
        &self,
        ticket_type: &str,
        origin: &str,
        destination: &str,
        travel_date_time: DateTime<Utc>,
        fixed_price: f64,
        distance_km: u32,
        customer_id: &str,
    ) -> Result<Ticket, TicketError> {
        let ticket_type = TicketType::resolve(ticket_type)?;
        let route = Route::new(origin, destination)?;
        if !fixed_price.is_finite() || fixed_price < 0.0 {
            return Err(TicketError::InvalidPrice(fixed_price));
        }

        self.reserve(ticket_type, route, travel_date_time, distance_km, round_cents(fixed_price), true, customer_id)
    }

    pub fn create_from_request(&self, request: &TicketRequest) -> Result<Ticket, TicketError> {
        match request.fixed_price {
            Some(price) => self.create_with_fixed_price(
                &request.ticket_type,
                &request.origin,
                &request.destination,
                request.travel_date_time,
                price,
                request.distance_km,
                &request.customer_id,
            ),
            None => self.create(
                &request.ticket_type,
                &request.origin,
                &request.destination,
                request.travel_date_time,
                request.distance_km,
                &request.customer_id,
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn reserve(
        &self,
        ticket_type: TicketType,
        route: Route,
        travel_date_time: DateTime<Utc>,
        distance_km: u32,
        base_price: f64,
        fixed_fare: bool,
        customer_id: &str,
    ) -> Result<Ticket, TicketError> {
        let event = TicketEvent::Reserved(TicketReserved {
            ticket_id: TicketId::generate(ticket_type),
            customer_id: customer_id.to_string(),
            ticket_type,
            route,
            travel_date_time,
            distance_km,
            base_price,
            fixed_fare,
            created_at: Utc::now(),
        });

        Ticket::apply_first_event(&event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::lifecycle::TicketState;
    use crate::domain::ticket::test_support::weekday_departure;

    #[test]
    fn test_create_frecciarossa_roma_milano() {
        let ticket = TicketFactory::new()
            .create("FRECCIA_ROSSA", "Roma", "Milano", weekday_departure(), 600, "cust-1")
            .unwrap();

        assert_eq!(ticket.base_price(), 108.0);
        assert_eq!(ticket.final_price(), 108.0);
        assert_eq!(ticket.state(), TicketState::Reserved);
        assert_eq!(ticket.ticket_type(), TicketType::FrecciaRossa);
        assert_eq!(ticket.customer_id(), "cust-1");
        assert!(ticket.id().as_str().starts_with("FR-"));
        assert!(!ticket.is_fixed_fare());
    }

    #[test]
    fn test_base_price_is_distance_times_rate() {
        let factory = TicketFactory::new();
        for ticket_type in TicketType::ALL {
            for distance in [1_u32, 37, 250, 1200] {
                let ticket = factory
                    .create(ticket_type.code(), "Torino", "Napoli", weekday_departure(), distance, "c")
                    .unwrap();
                let expected = round_cents(f64::from(distance) * ticket_type.rate_per_km());
                assert_eq!(ticket.base_price(), expected);
            }
        }
    }

    #[test]
    fn test_create_rejects_unknown_type() {
        let result = TicketFactory::new()
            .create("TGV", "Roma", "Milano", weekday_departure(), 600, "cust-1");
        assert!(matches!(result, Err(TicketError::UnknownTicketType(_))));
    }

    #[test]
    fn test_create_rejects_zero_distance() {
        let result = TicketFactory::new()
            .create("IC", "Roma", "Milano", weekday_departure(), 0, "cust-1");
        assert!(matches!(result, Err(TicketError::InvalidDistance(0))));
    }

    #[test]
    fn test_create_rejects_invalid_route() {
        let factory = TicketFactory::new();
        let same = factory.create("IC", "Roma", "Roma", weekday_departure(), 10, "cust-1");
        assert!(matches!(same, Err(TicketError::InvalidRoute(_))));

        let empty = factory.create("IC", "", "Roma", weekday_departure(), 10, "cust-1");
        assert!(matches!(empty, Err(TicketError::InvalidRoute(_))));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let factory = TicketFactory::new();
        let ids: std::collections::HashSet<_> = (0..500)
            .map(|_| {
                factory
                    .create("REG", "Firenze", "Pisa", weekday_departure(), 80, "cust-2")
                    .unwrap()
                    .id()
                    .clone()
            })
            .collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_fixed_price_ignores_distance() {
        let factory = TicketFactory::new();
        let ticket = factory
            .create_with_fixed_price("FR", "Roma", "Milano", weekday_departure(), 29.9, 600, "cust-1")
            .unwrap();

        assert_eq!(ticket.base_price(), 29.9);
        assert_eq!(ticket.distance_km(), 600);
        assert!(ticket.is_fixed_fare());
        assert_eq!(ticket.state(), TicketState::Reserved);

        let unknown_distance = factory
            .create_with_fixed_price("FR", "Roma", "Milano", weekday_departure(), 29.9, 0, "cust-1")
            .unwrap();
        assert_eq!(unknown_distance.base_price(), 29.9);
        assert_eq!(unknown_distance.distance_km(), 0);
    }

    #[test]
    fn test_fixed_price_still_validates_type_and_route() {
        let factory = TicketFactory::new();
        assert!(matches!(
            factory.create_with_fixed_price("XX", "Roma", "Milano", weekday_departure(), 10.0, 0, "c"),
            Err(TicketError::UnknownTicketType(_))
        ));
        assert!(matches!(
            factory.create_with_fixed_price("FR", "Milano", "milano", weekday_departure(), 10.0, 0, "c"),
            Err(TicketError::InvalidRoute(_))
        ));
        assert!(matches!(
            factory.create_with_fixed_price("FR", "Roma", "Milano", weekday_departure(), -5.0, 0, "c"),
            Err(TicketError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_create_from_request_dispatches_on_fixed_price() {
        let factory = TicketFactory::new();
        let json = r#"{
            "ticket_type": "ic",
            "origin": "Bologna",
            "destination": "Venezia",
            "travel_date_time": "2026-11-18T08:30:00Z",
            "distance_km": 150,
            "customer_id": "cust-9"
        }"#;
        let mut request: TicketRequest = serde_json::from_str(json).unwrap();

        let by_distance = factory.create_from_request(&request).unwrap();
        assert_eq!(by_distance.base_price(), 18.0);

        request.fixed_price = Some(9.9);
        let flat = factory.create_from_request(&request).unwrap();
        assert_eq!(flat.base_price(), 9.9);
        assert_eq!(flat.distance_km(), 150);
        assert!(flat.is_fixed_fare());
    }
}

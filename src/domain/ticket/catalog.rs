use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::TicketError;

// ============================================================================
// Ticket Type Catalog
// ============================================================================
//
// Fixed set of fare classes. Each entry carries a per-kilometre rate and
// descriptive metadata; nothing here changes at runtime.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    Regionale,
    Intercity,
    FrecciaRossa,
}

impl TicketType {
    /// Catalog order; also the order reported by `list_supported`.
    pub const ALL: [TicketType; 3] = [
        TicketType::Regionale,
        TicketType::Intercity,
        TicketType::FrecciaRossa,
    ];

    /// Resolve either the canonical name (`FRECCIA_ROSSA`) or the short code
    /// (`FR`), ignoring case and surrounding whitespace.
    pub fn resolve(identifier: &str) -> Result<TicketType, TicketError> {
        let wanted = identifier.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted) || t.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TicketError::UnknownTicketType(identifier.to_string()))
    }

    /// Canonical names of every supported type, in catalog order
    pub fn list_supported() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.name()).collect()
    }

    pub fn base_rate(identifier: &str) -> Result<f64, TicketError> {
        Self::resolve(identifier).map(TicketType::rate_per_km)
    }

    pub fn name(self) -> &'static str {
        match self {
            TicketType::Regionale => "REGIONALE",
            TicketType::Intercity => "INTERCITY",
            TicketType::FrecciaRossa => "FRECCIA_ROSSA",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            TicketType::Regionale => "REG",
            TicketType::Intercity => "IC",
            TicketType::FrecciaRossa => "FR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TicketType::Regionale => "Regionale",
            TicketType::Intercity => "Intercity",
            TicketType::FrecciaRossa => "Frecciarossa",
        }
    }

    pub fn rate_per_km(self) -> f64 {
        match self {
            TicketType::Regionale => 0.08,
            TicketType::Intercity => 0.12,
            TicketType::FrecciaRossa => 0.18,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TicketType::Regionale => "Regional train, stops at every station",
            TicketType::Intercity => "Intercity train between major cities",
            TicketType::FrecciaRossa => "High-speed train",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TicketType {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_name_and_code() {
        assert_eq!(TicketType::resolve("FRECCIA_ROSSA").unwrap(), TicketType::FrecciaRossa);
        assert_eq!(TicketType::resolve("fr").unwrap(), TicketType::FrecciaRossa);
        assert_eq!(TicketType::resolve("Intercity").unwrap(), TicketType::Intercity);
        assert_eq!(TicketType::resolve(" reg ").unwrap(), TicketType::Regionale);
    }

    #[test]
    fn test_resolve_unknown_type() {
        let result = TicketType::resolve("EUROSTAR");
        assert!(matches!(result, Err(TicketError::UnknownTicketType(ref id)) if id == "EUROSTAR"));
        assert!("".parse::<TicketType>().is_err());
    }

    #[test]
    fn test_list_supported_in_catalog_order() {
        assert_eq!(
            TicketType::list_supported(),
            vec!["REGIONALE", "INTERCITY", "FRECCIA_ROSSA"]
        );
    }

    #[test]
    fn test_base_rates_are_distinct() {
        assert_eq!(TicketType::base_rate("FR").unwrap(), 0.18);
        assert_eq!(TicketType::base_rate("IC").unwrap(), 0.12);
        assert_eq!(TicketType::base_rate("REG").unwrap(), 0.08);
        assert!(TicketType::base_rate("TGV").is_err());
    }

    #[test]
    fn test_serializes_as_canonical_name() {
        let json = serde_json::to_string(&TicketType::FrecciaRossa).unwrap();
        assert_eq!(json, "\"FRECCIA_ROSSA\"");
    }
}

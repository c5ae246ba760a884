use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::pricing::{Adjustment, DiscountRule};
use crate::domain::ticket::RefundPolicy;

// ============================================================================
// Application Configuration
// ============================================================================
//
// Loaded once at startup from TOML. Every section is optional; anything
// left out falls back to the defaults below.
//
//   log_filter = "info,train_ticketing=debug"
//
//   [refunds]
//   reserved = 1.0
//   confirmed = 0.8
//
//   [[pricing.rules]]
//   name = "Early booking"
//   condition = { kind = "booked_in_advance", days = 30 }
//   adjustment = { kind = "percent_off", percent = 15.0 }
//
// ============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {message}")]
    Invalid { message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Used when `RUST_LOG` is not set
    pub log_filter: String,
    pub pricing: PricingConfig,
    pub refunds: RefundPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Applied in order
    pub rules: Vec<DiscountRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info,train_ticketing=debug".to_string(),
            pricing: PricingConfig::default(),
            refunds: RefundPolicy::default(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rules: DiscountRule::default_chain(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for rule in &self.pricing.rules {
            if rule.name.trim().is_empty() {
                return Err(invalid("pricing rule name cannot be empty"));
            }
            if !names.insert(rule.name.as_str()) {
                return Err(invalid(format!("duplicate pricing rule name: {}", rule.name)));
            }
            validate_adjustment(&rule.name, &rule.adjustment)?;
        }

        for (state, ratio) in self.refunds.entries() {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(invalid(format!(
                    "refund ratio for {state} must be between 0 and 1, got {ratio}"
                )));
            }
        }

        Ok(())
    }
}

/// Upper bound for a single surcharge rule
pub const MAX_SURCHARGE_PERCENT: f64 = 1000.0;

fn validate_adjustment(rule: &str, adjustment: &Adjustment) -> Result<()> {
    match adjustment {
        Adjustment::PercentOff { percent } if !(0.0..=100.0).contains(percent) => Err(invalid(
            format!("rule {rule}: percent_off must be between 0 and 100, got {percent}"),
        )),
        Adjustment::Surcharge { percent } if !(0.0..=MAX_SURCHARGE_PERCENT).contains(percent) => {
            Err(invalid(format!(
                "rule {rule}: surcharge must be between 0 and {MAX_SURCHARGE_PERCENT}, got {percent}"
            )))
        }
        Adjustment::AmountOff { amount } if !amount.is_finite() || *amount < 0.0 => Err(invalid(
            format!("rule {rule}: amount_off must be non-negative, got {amount}"),
        )),
        _ => Ok(()),
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { message: message.into() }
}

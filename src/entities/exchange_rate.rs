use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference currency; every rate is expressed relative to it.
pub const BASE_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRate {
    pub currency: String,
    pub rate: f64,
    pub enabled: bool,
    pub last_updated: DateTime<Utc>,
}

impl ExchangeRate {
    pub fn new(currency: &str, rate: f64) -> Self {
        Self {
            currency: currency.to_string(),
            rate,
            enabled: true,
            last_updated: Utc::now(),
        }
    }

    pub fn is_base(&self) -> bool {
        self.currency == BASE_CURRENCY
    }
}

pub fn default_rates() -> Vec<(&'static str, f64)> {
    vec![("USD", 1.0), ("BDT", 103.0), ("EUR", 0.85), ("INR", 75.0)]
}

impl crate::database::repository_traits::EntityWithId for ExchangeRate {
    fn id_str(&self) -> &str {
        &self.currency
    }
}

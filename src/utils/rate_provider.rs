use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::entities::exchange_rate::default_rates;
use crate::interfaces::rate_provider::RateProviderInterface;
use crate::middleware::error::{AppError, AppResult};

/// Serves the built-in rate table.
pub struct StaticRateProvider;

#[async_trait]
impl RateProviderInterface for StaticRateProvider {
    async fn fetch_rates(&self) -> AppResult<Vec<(String, f64)>> {
        Ok(default_rates()
            .into_iter()
            .map(|(code, rate)| (code.to_string(), rate))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// Reads `{ "rates": { "<CODE>": <rate>, .. } }` with USD as the base.
pub struct HttpRateProvider {
    api_url: String,
    client: Client,
}

impl HttpRateProvider {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl RateProviderInterface for HttpRateProvider {
    async fn fetch_rates(&self) -> AppResult<Vec<(String, f64)>> {
        let response = self.client.get(&self.api_url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::RateProvider {
                source: format!("rates api responded with {}", response.status()),
            });
        }
        let body: RatesResponse = response.json().await?;
        let mut rates: Vec<(String, f64)> = body
            .rates
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .collect();
        rates.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(rates)
    }
}

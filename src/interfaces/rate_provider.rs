use async_trait::async_trait;

use crate::middleware::error::AppResult;

/// Source of the full exchange rate table, rates relative to USD.
#[async_trait]
pub trait RateProviderInterface {
    async fn fetch_rates(&self) -> AppResult<Vec<(String, f64)>>;
}

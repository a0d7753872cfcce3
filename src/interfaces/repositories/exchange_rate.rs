use async_trait::async_trait;

use crate::database::repository_traits::Mutation;
use crate::entities::exchange_rate::ExchangeRate;
use crate::middleware::error::AppResult;

#[async_trait]
pub trait ExchangeRateRepositoryInterface {
    async fn get_all(&self) -> AppResult<Vec<ExchangeRate>>;
    async fn get(&self, currency: &str) -> AppResult<ExchangeRate>;
    async fn update(&self, currency: &str, mutation: Mutation<ExchangeRate>)
        -> AppResult<ExchangeRate>;
    async fn replace_all(&self, rates: Vec<ExchangeRate>) -> AppResult<()>;
    async fn last_error(&self) -> Option<String>;
    async fn set_last_error(&self, error: Option<String>);
}

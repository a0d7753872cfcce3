use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::repository_impl::Repository;
use crate::database::repository_traits::Mutation;
use crate::entities::exchange_rate::ExchangeRate;
use crate::interfaces::repositories::exchange_rate::ExchangeRateRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};

pub const TABLE_NAME: &str = "exchange_rate";

#[derive(Debug)]
pub struct ExchangeRateRepository {
    table: Repository<ExchangeRate>,
    last_error: RwLock<Option<String>>,
}

impl ExchangeRateRepository {
    pub fn new() -> Self {
        Self {
            table: Repository::new(TABLE_NAME),
            last_error: RwLock::new(None),
        }
    }
}

#[async_trait]
impl ExchangeRateRepositoryInterface for ExchangeRateRepository {
    async fn get_all(&self) -> AppResult<Vec<ExchangeRate>> {
        Ok(self.table.filter(|_| true).await)
    }

    async fn get(&self, currency: &str) -> AppResult<ExchangeRate> {
        self.table
            .find(|r| r.currency == currency)
            .await
            .ok_or(AppError::CurrencyNotFound {
                code: currency.to_string(),
            })
    }

    async fn update(
        &self,
        currency: &str,
        mutation: Mutation<ExchangeRate>,
    ) -> AppResult<ExchangeRate> {
        self.table
            .update_entity(currency, mutation)
            .await
            .map_err(|e| match e {
                AppError::EntityFailIdNotFound { .. } => AppError::CurrencyNotFound {
                    code: currency.to_string(),
                },
                other => other,
            })
    }

    async fn replace_all(&self, rates: Vec<ExchangeRate>) -> AppResult<()> {
        self.table.replace_all(rates).await;
        Ok(())
    }

    async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    async fn set_last_error(&self, error: Option<String>) {
        *self.last_error.write().await = error;
    }
}

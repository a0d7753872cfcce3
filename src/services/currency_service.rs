use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::database::repository_traits::mutation;
use crate::entities::exchange_rate::{ExchangeRate, BASE_CURRENCY};
use crate::entities::user::User;
use crate::interfaces::rate_provider::RateProviderInterface;
use crate::interfaces::repositories::exchange_rate::ExchangeRateRepositoryInterface;
use crate::interfaces::repositories::user::UserRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct RateTable {
    pub rates: Vec<ExchangeRate>,
    pub last_error: Option<String>,
}

pub struct CurrencyService<'a, R>
where
    R: ExchangeRateRepositoryInterface,
{
    rate_repository: &'a R,
}

impl<'a, R> CurrencyService<'a, R>
where
    R: ExchangeRateRepositoryInterface,
{
    pub fn new(rate_repository: &'a R) -> Self {
        Self { rate_repository }
    }

    pub async fn list(&self, enabled_only: bool) -> AppResult<RateTable> {
        let rates = self
            .rate_repository
            .get_all()
            .await?
            .into_iter()
            .filter(|r| !enabled_only || r.enabled)
            .collect();
        Ok(RateTable {
            rates,
            last_error: self.rate_repository.last_error().await,
        })
    }

    async fn enabled_rate(&self, code: &str) -> AppResult<f64> {
        let rate = self.rate_repository.get(code).await?;
        if !rate.enabled {
            return Err(AppError::CurrencyDisabled {
                code: code.to_string(),
            });
        }
        Ok(rate.rate)
    }

    /// `amount / rate[from] * rate[to]`. Disabled currencies still convert; the flag only
    /// hides them from selection.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> AppResult<f64> {
        let from_rate = self.rate_repository.get(from).await?.rate;
        if from == to {
            return Ok(amount);
        }
        let to_rate = self.rate_repository.get(to).await?.rate;
        Ok(amount / from_rate * to_rate)
    }

    async fn unlocked(&self, code: &str) -> AppResult<()> {
        if self.rate_repository.get(code).await?.is_base() {
            return Err(AppError::CurrencyLocked {
                code: code.to_string(),
            });
        }
        Ok(())
    }

    pub async fn set_rate(&self, code: &str, rate: f64, enabled: bool) -> AppResult<ExchangeRate> {
        self.unlocked(code).await?;
        if !(rate.is_finite() && rate > 0.0) {
            return Err(AppError::InvalidRate);
        }
        let updated = self
            .rate_repository
            .update(
                code,
                mutation(move |r: &mut ExchangeRate| {
                    r.rate = rate;
                    r.enabled = enabled;
                    r.last_updated = Utc::now();
                    Ok(())
                }),
            )
            .await?;
        info!("->> exchange rate {code} set to {rate} enabled={enabled}");
        Ok(updated)
    }

    pub async fn toggle(&self, code: &str, enabled: bool) -> AppResult<ExchangeRate> {
        self.unlocked(code).await?;
        let updated = self
            .rate_repository
            .update(
                code,
                mutation(move |r: &mut ExchangeRate| {
                    r.enabled = enabled;
                    Ok(())
                }),
            )
            .await?;
        info!(
            "->> {code} has been {}",
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(updated)
    }

    /// Replaces the whole table from the provider, keeping each currency's enabled flag.
    /// USD stays pinned at 1.
    pub async fn refresh(&self, provider: &(dyn RateProviderInterface + Send + Sync)) -> AppResult<Vec<ExchangeRate>> {
        let fetched = match provider.fetch_rates().await {
            Ok(rates) => rates,
            Err(err) => {
                error!("->> exchange rate refresh failed: {err}");
                self.rate_repository
                    .set_last_error(Some("Failed to update exchange rates".to_string()))
                    .await;
                return Err(err);
            }
        };

        let enabled: HashMap<String, bool> = self
            .rate_repository
            .get_all()
            .await?
            .into_iter()
            .map(|r| (r.currency, r.enabled))
            .collect();

        let now = Utc::now();
        let mut rates: Vec<ExchangeRate> = fetched
            .into_iter()
            .filter(|(code, _)| code != BASE_CURRENCY)
            .map(|(code, rate)| ExchangeRate {
                enabled: enabled.get(&code).copied().unwrap_or(true),
                currency: code,
                rate,
                last_updated: now,
            })
            .collect();
        rates.insert(
            0,
            ExchangeRate {
                currency: BASE_CURRENCY.to_string(),
                rate: 1.0,
                enabled: true,
                last_updated: now,
            },
        );

        self.rate_repository.replace_all(rates.clone()).await?;
        self.rate_repository.set_last_error(None).await;
        info!("->> exchange rates refreshed, {} currencies", rates.len());
        Ok(rates)
    }

    /// Stores the user's display currency; only enabled currencies can be selected.
    pub async fn set_selected_currency<U: UserRepositoryInterface>(
        &self,
        user_repository: &U,
        user_id: &str,
        code: &str,
    ) -> AppResult<User> {
        self.enabled_rate(code).await?;
        let code = code.to_string();
        user_repository
            .update(
                user_id,
                mutation(move |u: &mut User| {
                    u.preferred_currency = code;
                    Ok(())
                }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::exchange_rates::ExchangeRateRepository;
    use crate::database::repositories::users::UserRepository;
    use crate::entities::exchange_rate::default_rates;
    use crate::entities::user::{UserRole, UserStatus};
    use crate::utils::rate_provider::StaticRateProvider;
    use async_trait::async_trait;

    async fn seeded() -> ExchangeRateRepository {
        let repo = ExchangeRateRepository::new();
        repo.replace_all(
            default_rates()
                .into_iter()
                .map(|(code, rate)| ExchangeRate::new(code, rate))
                .collect(),
        )
        .await
        .unwrap();
        repo
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[tokio::test]
    async fn converting_to_same_currency_is_identity() {
        let repo = seeded().await;
        let service = CurrencyService::new(&repo);
        for (code, _) in default_rates() {
            for x in [0.0, 1.0, 12.34, 1e6] {
                assert_eq!(service.convert(x, code, code).await.unwrap(), x);
            }
        }
    }

    #[tokio::test]
    async fn conversion_round_trips_between_enabled_pairs() {
        let repo = seeded().await;
        let service = CurrencyService::new(&repo);
        let codes: Vec<&str> = default_rates().into_iter().map(|(c, _)| c).collect();
        for a in &codes {
            for b in &codes {
                let x = 250.75;
                let there = service.convert(x, a, b).await.unwrap();
                let back = service.convert(there, b, a).await.unwrap();
                assert!(close(back, x), "{a}->{b}: {back} != {x}");
            }
        }
        assert_eq!(service.convert(10.0, "USD", "BDT").await.unwrap(), 1030.0);
    }

    #[tokio::test]
    async fn disabled_currencies_convert_but_can_not_be_selected() {
        let repo = seeded().await;
        let users = UserRepository::new();
        users
            .create(User {
                id: "u1".to_string(),
                name: "Karim".to_string(),
                email: "karim@example.com".to_string(),
                password_hash: String::new(),
                role: UserRole::User,
                status: UserStatus::Active,
                referral_code: "KARIM001".to_string(),
                referred_by: None,
                referral_count: 0,
                referral_rewards: 0.0,
                tasks_completed: 0,
                total_earnings: 0.0,
                balance: 0.0,
                preferred_currency: "USD".to_string(),
                payments: vec![],
                join_date: Utc::now(),
            })
            .await
            .unwrap();
        let service = CurrencyService::new(&repo);
        service.toggle("EUR", false).await.unwrap();

        assert!(close(service.convert(1.7, "EUR", "USD").await.unwrap(), 2.0));
        assert_eq!(
            service.set_selected_currency(&users, "u1", "EUR").await.unwrap_err(),
            AppError::CurrencyDisabled {
                code: "EUR".to_string()
            }
        );
        assert_eq!(
            service.convert(1.0, "USD", "JPY").await.unwrap_err(),
            AppError::CurrencyNotFound {
                code: "JPY".to_string()
            }
        );
        assert_eq!(service.list(true).await.unwrap().rates.len(), 3);
    }

    #[tokio::test]
    async fn usd_is_pinned() {
        let repo = seeded().await;
        let service = CurrencyService::new(&repo);
        assert!(matches!(
            service.set_rate("USD", 2.0, true).await,
            Err(AppError::CurrencyLocked { .. })
        ));
        assert!(matches!(
            service.toggle("USD", false).await,
            Err(AppError::CurrencyLocked { .. })
        ));
        assert_eq!(
            service.set_rate("BDT", 0.0, true).await.unwrap_err(),
            AppError::InvalidRate
        );
        let bdt = service.set_rate("BDT", 110.0, true).await.unwrap();
        assert_eq!(bdt.rate, 110.0);
    }

    #[tokio::test]
    async fn refresh_keeps_enabled_flags() {
        let repo = seeded().await;
        let service = CurrencyService::new(&repo);
        service.set_rate("INR", 80.0, false).await.unwrap();
        let rates = service.refresh(&StaticRateProvider).await.unwrap();
        let inr = rates.iter().find(|r| r.currency == "INR").unwrap();
        assert_eq!(inr.rate, 75.0);
        assert!(!inr.enabled);
        assert_eq!(rates[0].currency, "USD");
    }

    struct FailingProvider;

    #[async_trait]
    impl RateProviderInterface for FailingProvider {
        async fn fetch_rates(&self) -> AppResult<Vec<(String, f64)>> {
            Err(AppError::RateProvider {
                source: "timeout".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn failed_refresh_keeps_table_and_records_error() {
        let repo = seeded().await;
        let service = CurrencyService::new(&repo);
        assert!(service.refresh(&FailingProvider).await.is_err());
        let table = service.list(false).await.unwrap();
        assert_eq!(table.rates.len(), 4);
        assert_eq!(
            table.last_error.as_deref(),
            Some("Failed to update exchange rates")
        );
        service.refresh(&StaticRateProvider).await.unwrap();
        assert_eq!(service.list(false).await.unwrap().last_error, None);
    }
}

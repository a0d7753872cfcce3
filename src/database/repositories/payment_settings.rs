use async_trait::async_trait;
use dashmap::DashMap;

use crate::database::repository_traits::Mutation;
use crate::entities::payment_settings::PaymentMethodSettings;
use crate::entities::withdrawal::MobileRail;
use crate::interfaces::repositories::payment_settings::PaymentSettingsRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};

#[derive(Debug)]
pub struct PaymentSettingsRepository {
    methods: DashMap<MobileRail, PaymentMethodSettings>,
}

impl PaymentSettingsRepository {
    pub fn new() -> Self {
        let methods = DashMap::new();
        for method in [MobileRail::BKash, MobileRail::Nagad] {
            methods.insert(method, PaymentMethodSettings::new(method, "01XXXXXXXXX"));
        }
        Self { methods }
    }
}

#[async_trait]
impl PaymentSettingsRepositoryInterface for PaymentSettingsRepository {
    async fn get_all(&self) -> AppResult<Vec<PaymentMethodSettings>> {
        let mut all: Vec<PaymentMethodSettings> =
            self.methods.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|s| s.method.to_string());
        Ok(all)
    }

    async fn get(&self, method: MobileRail) -> AppResult<PaymentMethodSettings> {
        self.methods
            .get(&method)
            .map(|e| e.value().clone())
            .ok_or(AppError::EntityFailIdNotFound {
                ident: format!("payment_method:{method}"),
            })
    }

    async fn update(
        &self,
        method: MobileRail,
        mutation: Mutation<PaymentMethodSettings>,
    ) -> AppResult<PaymentMethodSettings> {
        let mut entry = self
            .methods
            .get_mut(&method)
            .ok_or(AppError::EntityFailIdNotFound {
                ident: format!("payment_method:{method}"),
            })?;
        let mut updated = entry.value().clone();
        mutation(&mut updated)?;
        *entry.value_mut() = updated.clone();
        Ok(updated)
    }
}

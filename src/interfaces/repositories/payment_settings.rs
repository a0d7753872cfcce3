use async_trait::async_trait;

use crate::database::repository_traits::Mutation;
use crate::entities::payment_settings::PaymentMethodSettings;
use crate::entities::withdrawal::MobileRail;
use crate::middleware::error::AppResult;

#[async_trait]
pub trait PaymentSettingsRepositoryInterface {
    async fn get_all(&self) -> AppResult<Vec<PaymentMethodSettings>>;
    async fn get(&self, method: MobileRail) -> AppResult<PaymentMethodSettings>;
    async fn update(
        &self,
        method: MobileRail,
        mutation: Mutation<PaymentMethodSettings>,
    ) -> AppResult<PaymentMethodSettings>;
}

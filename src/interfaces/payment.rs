use async_trait::async_trait;

use crate::entities::withdrawal::PayoutDestination;

/// Outbound money transfer to a user's mobile wallet or crypto address.
#[async_trait]
pub trait PayoutGatewayInterface {
    /// Returns the gateway transaction reference.
    async fn send_money(
        &self,
        withdrawal_id: &str,
        destination: &PayoutDestination,
        amount: f64,
        currency: &str,
    ) -> Result<String, String>;
}

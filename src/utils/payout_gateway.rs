use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::info;

use crate::entities::withdrawal::PayoutDestination;
use crate::interfaces::payment::PayoutGatewayInterface;
use crate::utils::generate::generate_id;

pub const PAYOUT_FAILED_MESSAGE: &str = "Transaction failed. Please try again.";

/// Stand-in for the bKash / Nagad / USDT transfer APIs: waits, then fails a
/// configurable share of transfers.
pub struct SimulatedPayoutGateway {
    delay: Duration,
    failure_rate: f64,
}

impl SimulatedPayoutGateway {
    pub fn new(delay: Duration, failure_rate: f64) -> Self {
        Self {
            delay,
            failure_rate: if failure_rate.is_nan() {
                0.0
            } else {
                failure_rate.clamp(0.0, 1.0)
            },
        }
    }
}

#[async_trait]
impl PayoutGatewayInterface for SimulatedPayoutGateway {
    async fn send_money(
        &self,
        withdrawal_id: &str,
        destination: &PayoutDestination,
        amount: f64,
        currency: &str,
    ) -> Result<String, String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failed = rand::thread_rng().gen_bool(self.failure_rate);
        if failed {
            return Err(PAYOUT_FAILED_MESSAGE.to_string());
        }

        let tx_id = generate_id();
        info!(
            "->> payout {withdrawal_id} sent {amount} {currency} via {} tx={tx_id}",
            destination.method_name()
        );
        Ok(tx_id)
    }
}

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc};

use crate::config::AppConfig;
use crate::database::client::Database;
use crate::entities::notification::Notification;
use crate::interfaces::payment::PayoutGatewayInterface;
use crate::interfaces::rate_provider::RateProviderInterface;
use crate::services::live_update::{PushReceiver, PushSender};
use crate::utils::jwt::JWT;
use crate::utils::payout_gateway::SimulatedPayoutGateway;
use crate::utils::rate_provider::{HttpRateProvider, StaticRateProvider};

pub const JWT_KEY: &str = "jwt";
const EVENT_BUS_CAPACITY: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub enum AppEventType {
    UserNotificationEvent(Notification),
}

#[derive(Debug, Clone, Serialize)]
pub struct AppEvent {
    pub user_id: String,
    pub event: AppEventType,
    #[serde(skip_serializing)]
    pub receivers: Vec<String>,
}

pub struct CtxState {
    pub db: Database,
    pub jwt: JWT,
    pub event_sender: broadcast::Sender<AppEvent>,
    pub push_sender: PushSender,
    /// Taken once by the live-update client.
    pub push_receiver: Mutex<Option<PushReceiver>>,
    pub rate_provider: Arc<dyn RateProviderInterface + Send + Sync>,
    pub payout_gateway: Arc<dyn PayoutGatewayInterface + Send + Sync>,
    pub public_url: String,
    pub live_update_url: String,
    pub referral_reward: f64,
    pub matching_game_reward: f64,
    pub match_delay: Duration,
    pub is_development: bool,
}

impl Debug for CtxState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("CTX STATE HERE :)")
    }
}

pub fn create_ctx_state(db: Database, config: &AppConfig) -> Arc<CtxState> {
    let (event_sender, _) = broadcast::channel(EVENT_BUS_CAPACITY);
    let (push_sender, push_receiver) = mpsc::unbounded_channel();
    let rate_provider: Arc<dyn RateProviderInterface + Send + Sync> = match &config.rates_api_url
    {
        Some(url) => Arc::new(HttpRateProvider::new(url)),
        None => Arc::new(StaticRateProvider),
    };
    let ctx_state = CtxState {
        db,
        jwt: JWT::new(
            config.jwt_secret.clone(),
            chrono::Duration::days(config.jwt_duration_days),
        ),
        event_sender,
        push_sender,
        push_receiver: Mutex::new(Some(push_receiver)),
        rate_provider,
        payout_gateway: Arc::new(SimulatedPayoutGateway::new(
            Duration::from_millis(config.payout_delay_ms),
            config.payout_failure_rate,
        )),
        public_url: config.public_url.clone(),
        live_update_url: config.live_update_url.clone(),
        referral_reward: config.referral_reward,
        matching_game_reward: config.matching_game_reward,
        match_delay: Duration::from_millis(config.match_delay_ms),
        is_development: config.is_development,
    };
    Arc::new(ctx_state)
}

use tracing::info;

use crate::database::repositories::{
    dashboard::DashboardRepository, exchange_rates::ExchangeRateRepository,
    notifications::NotificationRepository, payment_settings::PaymentSettingsRepository,
    tasks::TaskRepository, users::UserRepository, withdrawals::WithdrawalRepository,
};

#[derive(Debug)]
pub struct Database {
    pub users: UserRepository,
    pub tasks: TaskRepository,
    pub withdrawals: WithdrawalRepository,
    pub notifications: NotificationRepository,
    pub exchange_rates: ExchangeRateRepository,
    pub payment_settings: PaymentSettingsRepository,
    pub dashboard: DashboardRepository,
}

impl Database {
    pub fn new() -> Self {
        info!("->> creating in-memory stores");
        Self {
            users: UserRepository::new(),
            tasks: TaskRepository::new(),
            withdrawals: WithdrawalRepository::new(),
            notifications: NotificationRepository::new(),
            exchange_rates: ExchangeRateRepository::new(),
            payment_settings: PaymentSettingsRepository::new(),
            dashboard: DashboardRepository::new(),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

pub mod dashboard;
pub mod exchange_rates;
pub mod notifications;
pub mod payment_settings;
pub mod tasks;
pub mod users;
pub mod withdrawals;

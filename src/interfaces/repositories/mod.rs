pub mod dashboard;
pub mod exchange_rate;
pub mod notification;
pub mod payment_settings;
pub mod task;
pub mod user;
pub mod withdrawal;

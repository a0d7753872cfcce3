pub mod auth_service;
pub mod currency_service;
pub mod dashboard_service;
pub mod live_update;
pub mod notification_service;
pub mod task_service;
pub mod user_service;
pub mod withdrawal_service;

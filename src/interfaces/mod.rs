pub mod payment;
pub mod rate_provider;
pub mod repositories;

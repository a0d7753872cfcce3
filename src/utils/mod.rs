pub mod generate;
pub mod hash;
pub mod jwt;
pub mod validate_utils;
pub mod payout_gateway;
pub mod rate_provider;

use serde::{Deserialize, Serialize};

use super::withdrawal::MobileRail;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethodSettings {
    pub method: MobileRail,
    pub enabled: bool,
    pub merchant_number: String,
}

impl PaymentMethodSettings {
    pub fn new(method: MobileRail, merchant_number: &str) -> Self {
        Self {
            method,
            enabled: true,
            merchant_number: merchant_number.to_string(),
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
pub enum PaymentMethod {
    #[serde(rename = "manual")]
    #[strum(serialize = "manual")]
    Manual,
    #[serde(rename = "USDT")]
    #[strum(serialize = "USDT")]
    Usdt,
    #[serde(rename = "bKash")]
    #[strum(serialize = "bKash")]
    BKash,
    #[serde(rename = "Nagad")]
    #[strum(serialize = "Nagad")]
    Nagad,
}

/// Manual credit recorded by an admin in a user's payment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub currency: String,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: NaiveDate,
}

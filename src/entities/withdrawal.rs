use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::database::repository_traits::EntityWithId;
use crate::middleware::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum MobileRail {
    #[serde(rename = "bKash")]
    #[strum(serialize = "bKash")]
    BKash,
    #[serde(rename = "Nagad")]
    #[strum(serialize = "Nagad")]
    Nagad,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayoutDestination {
    Mobile {
        method: MobileRail,
        phone_number: String,
    },
    Wallet {
        wallet_address: String,
    },
}

impl PayoutDestination {
    pub fn method_name(&self) -> String {
        match self {
            PayoutDestination::Mobile { method, .. } => method.to_string(),
            PayoutDestination::Wallet { .. } => "wallet".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
}

impl WithdrawalStatus {
    /// Requests leave `pending` exactly once; approved and rejected are final.
    pub fn transition(&self, to: WithdrawalStatus) -> AppResult<WithdrawalStatus> {
        match (self, to) {
            (WithdrawalStatus::Pending, WithdrawalStatus::Approved)
            | (WithdrawalStatus::Pending, WithdrawalStatus::Rejected) => Ok(to),
            _ => Err(AppError::InvalidStatusTransition {
                from: self.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub amount: f64,
    pub destination: PayoutDestination,
    pub status: WithdrawalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntityWithId for WithdrawalRequest {
    fn id_str(&self) -> &str {
        &self.id
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::payment::Payment;
use crate::database::repository_traits::EntityWithId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    Active,
    Banned,
    Inactive,
}

impl UserStatus {
    /// Admin toggle: an active account gets banned, any other account is reactivated.
    pub fn toggled(&self) -> UserStatus {
        match self {
            UserStatus::Active => UserStatus::Banned,
            UserStatus::Banned | UserStatus::Inactive => UserStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub referral_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,
    pub referral_count: u32,
    pub referral_rewards: f64,
    pub tasks_completed: u32,
    pub total_earnings: f64,
    pub balance: f64,
    pub preferred_currency: String,
    pub payments: Vec<Payment>,
    pub join_date: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn credit(&mut self, amount: f64) {
        self.total_earnings += amount;
        self.balance += amount;
    }

    pub fn add_referral_reward(&mut self, amount: f64) {
        self.referral_rewards += amount;
        self.referral_count += 1;
        self.credit(amount);
    }
}

impl EntityWithId for User {
    fn id_str(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn toggle_only_flips_between_active_and_banned() {
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Banned);
        assert_eq!(UserStatus::Banned.toggled(), UserStatus::Active);
        assert_eq!(UserStatus::Inactive.toggled(), UserStatus::Active);
        assert_eq!(UserStatus::Active.toggled().toggled(), UserStatus::Active);
    }

    #[test]
    fn role_round_trips_as_lowercase() {
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::from_str("user").unwrap(), UserRole::User);
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }
}

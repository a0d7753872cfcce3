use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::database::repository_traits::EntityWithId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Inactive,
}

impl TaskStatus {
    pub fn toggled(&self) -> TaskStatus {
        match self {
            TaskStatus::Active => TaskStatus::Inactive,
            TaskStatus::Inactive => TaskStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub market_value: f64,
    pub completions: u32,
    pub total_paid: f64,
    pub status: TaskStatus,
}

impl Task {
    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active
    }

    pub fn record_completion(&mut self, paid: f64) {
        self.completions += 1;
        self.total_paid += paid;
    }
}

impl EntityWithId for Task {
    fn id_str(&self) -> &str {
        &self.id
    }
}

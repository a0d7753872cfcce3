use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub total_earnings: f64,
    pub daily_earnings: f64,
    pub commissions: f64,
    pub daily_date: NaiveDate,
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self {
            total_tasks: 0,
            completed_tasks: 0,
            total_earnings: 0.0,
            daily_earnings: 0.0,
            commissions: 0.0,
            daily_date: Utc::now().date_naive(),
        }
    }
}

impl DashboardStats {
    /// Daily earnings restart at zero on the first update of a new UTC day.
    pub fn roll_day(&mut self, today: NaiveDate) {
        if self.daily_date != today {
            self.daily_date = today;
            self.daily_earnings = 0.0;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformStats {
    pub total_users: usize,
    pub active_users: usize,
    pub tasks_completed: u32,
    pub completion_rate: f64,
    pub total_earnings: f64,
    pub pending_withdrawals: usize,
    pub pending_withdrawal_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_earnings_reset_on_new_day() {
        let yesterday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut stats = DashboardStats {
            daily_earnings: 5.25,
            daily_date: yesterday,
            ..DashboardStats::default()
        };
        stats.roll_day(yesterday);
        assert_eq!(stats.daily_earnings, 5.25);
        stats.roll_day(today);
        assert_eq!(stats.daily_earnings, 0.0);
        assert_eq!(stats.daily_date, today);
    }
}

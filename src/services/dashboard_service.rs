use chrono::Utc;

use crate::database::repository_traits::mutation;
use crate::entities::dashboard::{DashboardStats, PlatformStats};
use crate::entities::task::TaskStatus;
use crate::entities::user::{UserRole, UserStatus};
use crate::entities::withdrawal::WithdrawalStatus;
use crate::interfaces::repositories::dashboard::DashboardRepositoryInterface;
use crate::interfaces::repositories::task::TaskRepositoryInterface;
use crate::interfaces::repositories::user::UserRepositoryInterface;
use crate::interfaces::repositories::withdrawal::WithdrawalRepositoryInterface;
use crate::middleware::error::AppResult;

/// Per-user dashboard counters.
pub struct DashboardService<'a, D>
where
    D: DashboardRepositoryInterface,
{
    dashboard_repository: &'a D,
}

impl<'a, D> DashboardService<'a, D>
where
    D: DashboardRepositoryInterface,
{
    pub fn new(dashboard_repository: &'a D) -> Self {
        Self {
            dashboard_repository,
        }
    }

    pub async fn get(&self, user_id: &str) -> AppResult<DashboardStats> {
        let mut stats = self.dashboard_repository.get(user_id).await?;
        stats.roll_day(Utc::now().date_naive());
        Ok(stats)
    }

    pub async fn set_total_tasks(&self, user_id: &str, count: u32) -> AppResult<DashboardStats> {
        self.dashboard_repository
            .update(
                user_id,
                mutation(move |s: &mut DashboardStats| {
                    s.total_tasks = count;
                    Ok(())
                }),
            )
            .await
    }

    pub async fn set_completed_tasks(&self, user_id: &str, count: u32) -> AppResult<DashboardStats> {
        self.dashboard_repository
            .update(
                user_id,
                mutation(move |s: &mut DashboardStats| {
                    s.completed_tasks = count;
                    Ok(())
                }),
            )
            .await
    }

    pub async fn update_earnings(&self, user_id: &str, amount: f64) -> AppResult<DashboardStats> {
        self.dashboard_repository
            .update(
                user_id,
                mutation(move |s: &mut DashboardStats| {
                    s.total_earnings += amount;
                    Ok(())
                }),
            )
            .await
    }

    pub async fn update_daily_earnings(
        &self,
        user_id: &str,
        amount: f64,
    ) -> AppResult<DashboardStats> {
        let today = Utc::now().date_naive();
        self.dashboard_repository
            .update(
                user_id,
                mutation(move |s: &mut DashboardStats| {
                    s.roll_day(today);
                    s.daily_earnings += amount;
                    Ok(())
                }),
            )
            .await
    }

    pub async fn update_commissions(&self, user_id: &str, amount: f64) -> AppResult<DashboardStats> {
        self.dashboard_repository
            .update(
                user_id,
                mutation(move |s: &mut DashboardStats| {
                    s.commissions += amount;
                    Ok(())
                }),
            )
            .await
    }

    /// Completion bookkeeping in one update: counters and both earnings totals.
    pub async fn record_task_completion(
        &self,
        user_id: &str,
        total_tasks: u32,
        completed_tasks: u32,
        reward: f64,
    ) -> AppResult<DashboardStats> {
        let today = Utc::now().date_naive();
        self.dashboard_repository
            .update(
                user_id,
                mutation(move |s: &mut DashboardStats| {
                    s.roll_day(today);
                    s.total_tasks = total_tasks;
                    s.completed_tasks = completed_tasks;
                    s.total_earnings += reward;
                    s.daily_earnings += reward;
                    Ok(())
                }),
            )
            .await
    }
}

/// Admin overview aggregated over all stores.
pub struct PlatformStatsService<'a, U, T, W>
where
    U: UserRepositoryInterface,
    T: TaskRepositoryInterface,
    W: WithdrawalRepositoryInterface,
{
    user_repository: &'a U,
    task_repository: &'a T,
    withdrawal_repository: &'a W,
}

impl<'a, U, T, W> PlatformStatsService<'a, U, T, W>
where
    U: UserRepositoryInterface,
    T: TaskRepositoryInterface,
    W: WithdrawalRepositoryInterface,
{
    pub fn new(user_repository: &'a U, task_repository: &'a T, withdrawal_repository: &'a W) -> Self {
        Self {
            user_repository,
            task_repository,
            withdrawal_repository,
        }
    }

    pub async fn platform_stats(&self) -> AppResult<PlatformStats> {
        let users: Vec<_> = self
            .user_repository
            .search(None)
            .await?
            .into_iter()
            .filter(|u| u.role == UserRole::User)
            .collect();
        let active_users = users
            .iter()
            .filter(|u| u.status == UserStatus::Active)
            .count();
        let tasks = self.task_repository.list(None).await?;
        let active_tasks = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Active)
            .count();
        let tasks_completed: u32 = tasks.iter().map(|t| t.completions).sum();
        let pending = self
            .withdrawal_repository
            .list(Some(WithdrawalStatus::Pending), None)
            .await?;

        Ok(PlatformStats {
            total_users: users.len(),
            active_users,
            tasks_completed,
            completion_rate: completion_rate(
                users.iter().map(|u| u.tasks_completed).sum(),
                active_users * active_tasks,
            ),
            total_earnings: users.iter().map(|u| u.total_earnings).sum(),
            pending_withdrawals: pending.len(),
            pending_withdrawal_amount: pending.iter().map(|w| w.amount).sum(),
        })
    }
}

/// Percentage of available task slots completed, one decimal, capped at 100.
pub fn completion_rate(completed: u32, available: usize) -> f64 {
    if available == 0 {
        return 0.0;
    }
    let rate = f64::from(completed) / available as f64 * 100.0;
    (rate.min(100.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::dashboard::DashboardRepository;

    #[tokio::test]
    async fn counters_accumulate() {
        let repo = DashboardRepository::new();
        let service = DashboardService::new(&repo);
        service.set_total_tasks("u1", 60).await.unwrap();
        service.set_completed_tasks("u1", 18).await.unwrap();
        service.update_earnings("u1", 30.0).await.unwrap();
        service.update_earnings("u1", 0.5).await.unwrap();
        service.update_daily_earnings("u1", 5.25).await.unwrap();
        service.update_commissions("u1", 2.5).await.unwrap();

        let stats = service.get("u1").await.unwrap();
        assert_eq!(stats.total_tasks, 60);
        assert_eq!(stats.completed_tasks, 18);
        assert_eq!(stats.total_earnings, 30.5);
        assert_eq!(stats.daily_earnings, 5.25);
        assert_eq!(stats.commissions, 2.5);

        let other = service.get("u2").await.unwrap();
        assert_eq!(other.total_earnings, 0.0);
    }

    #[test]
    fn completion_rate_is_bounded() {
        assert_eq!(completion_rate(18, 60), 30.0);
        assert_eq!(completion_rate(5, 0), 0.0);
        assert_eq!(completion_rate(200, 10), 100.0);
    }
}

use std::time::Duration;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::database::repository_traits::mutation;
use crate::entities::task::{Task, TaskStatus};
use crate::entities::user::{User, UserStatus};
use crate::interfaces::repositories::dashboard::DashboardRepositoryInterface;
use crate::interfaces::repositories::task::TaskRepositoryInterface;
use crate::interfaces::repositories::user::UserRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};
use crate::services::dashboard_service::DashboardService;
use crate::services::live_update::{publish, PushEvent, PushSender};
use crate::utils::generate::generate_id;
use crate::utils::validate_utils::trim_string;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct TaskInput {
    #[serde(deserialize_with = "trim_string")]
    #[validate(length(min = 1, message = "Min 1 character"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than zero"))]
    pub price: f64,
    #[validate(range(exclusive_min = 0.0, message = "Market value must be greater than zero"))]
    pub market_value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub task: Task,
    pub reward: f64,
    pub balance: f64,
    pub tasks_completed: u32,
}

pub struct TaskService<'a, T, U, D>
where
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
    D: DashboardRepositoryInterface,
{
    task_repository: &'a T,
    user_repository: &'a U,
    dashboard_service: DashboardService<'a, D>,
    push_sender: &'a PushSender,
}

impl<'a, T, U, D> TaskService<'a, T, U, D>
where
    T: TaskRepositoryInterface,
    U: UserRepositoryInterface,
    D: DashboardRepositoryInterface,
{
    pub fn new(
        task_repository: &'a T,
        user_repository: &'a U,
        dashboard_repository: &'a D,
        push_sender: &'a PushSender,
    ) -> Self {
        Self {
            task_repository,
            user_repository,
            dashboard_service: DashboardService::new(dashboard_repository),
            push_sender,
        }
    }

    pub async fn list_active(&self) -> AppResult<Vec<Task>> {
        self.task_repository.list(Some(TaskStatus::Active)).await
    }

    pub async fn list_all(&self, search: Option<&str>) -> AppResult<Vec<Task>> {
        let term = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        let tasks = self.task_repository.list(None).await?;
        Ok(tasks
            .into_iter()
            .filter(|t| term.is_empty() || t.name.to_lowercase().contains(&term))
            .collect())
    }

    pub async fn create(&self, input: TaskInput) -> AppResult<Task> {
        input.validate()?;
        let task = self
            .task_repository
            .create(Task {
                id: generate_id(),
                name: input.name,
                price: input.price,
                market_value: input.market_value,
                completions: 0,
                total_paid: 0.0,
                status: TaskStatus::Active,
            })
            .await?;
        info!("->> task {} created: {}", task.id, task.name);
        Ok(task)
    }

    pub async fn toggle_status(&self, task_id: &str) -> AppResult<Task> {
        let task = self
            .task_repository
            .update(
                task_id,
                mutation(|t: &mut Task| {
                    t.status = t.status.toggled();
                    Ok(())
                }),
            )
            .await?;
        info!("->> task {task_id} is now {}", task.status);
        Ok(task)
    }

    /// Pays `reward` (the task price when absent) for one completion of an active task.
    pub async fn complete_task(
        &self,
        user_id: &str,
        task_id: &str,
        reward: Option<f64>,
    ) -> AppResult<TaskCompletion> {
        let user = self.user_repository.get_by_id(user_id).await?;
        if user.status == UserStatus::Banned {
            return Err(AppError::UserBanned);
        }

        let current = self.task_repository.get_by_id(task_id).await?;
        let reward = reward.unwrap_or(current.price);

        let task = self
            .task_repository
            .update(
                task_id,
                mutation(move |t: &mut Task| {
                    if !t.is_active() {
                        return Err(AppError::TaskInactive);
                    }
                    t.record_completion(reward);
                    Ok(())
                }),
            )
            .await?;

        let user = self
            .user_repository
            .update(
                user_id,
                mutation(move |u: &mut User| {
                    u.tasks_completed += 1;
                    u.credit(reward);
                    Ok(())
                }),
            )
            .await?;

        let active_tasks = self.list_active().await?.len() as u32;
        self.dashboard_service
            .record_task_completion(user_id, active_tasks, user.tasks_completed, reward)
            .await?;

        let receivers = vec![user_id.to_string()];
        publish(
            self.push_sender,
            user_id,
            receivers.clone(),
            PushEvent::TaskCompleted {
                task_name: task.name.clone(),
            },
        );
        publish(
            self.push_sender,
            user_id,
            receivers,
            PushEvent::RewardEarned {
                amount: reward,
                task_name: task.name.clone(),
            },
        );

        info!("->> user {user_id} completed task {task_id} for {reward}");
        Ok(TaskCompletion {
            task,
            reward,
            balance: user.balance,
            tasks_completed: user.tasks_completed,
        })
    }

    /// Waits for the simulated match, then completes a random active task for a fixed reward.
    pub async fn play_matching_game(
        &self,
        user_id: &str,
        match_delay: Duration,
        reward: f64,
    ) -> AppResult<TaskCompletion> {
        let active = self.list_active().await?;
        let task_id = active
            .choose(&mut rand::thread_rng())
            .map(|t| t.id.clone())
            .ok_or(AppError::Generic {
                description: "No active tasks available".to_string(),
            })?;

        if !match_delay.is_zero() {
            tokio::time::sleep(match_delay).await;
        }

        self.complete_task(user_id, &task_id, Some(reward)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::{
        dashboard::DashboardRepository, tasks::TaskRepository, users::UserRepository,
    };
    use crate::entities::user::UserRole;
    use chrono::Utc;
    use tokio::sync::mpsc;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: "Tester".to_string(),
            email: format!("{id}@example.com"),
            password_hash: String::new(),
            role: UserRole::User,
            status: UserStatus::Active,
            referral_code: "CODE0001".to_string(),
            referred_by: None,
            referral_count: 0,
            referral_rewards: 0.0,
            tasks_completed: 0,
            total_earnings: 0.0,
            balance: 0.0,
            preferred_currency: "USD".to_string(),
            payments: vec![],
            join_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn completion_credits_user_and_task() {
        let tasks = TaskRepository::new();
        let users = UserRepository::new();
        let dashboard = DashboardRepository::new();
        let (sender, mut rx) = mpsc::unbounded_channel();
        users.create(user("u1")).await.unwrap();
        let service = TaskService::new(&tasks, &users, &dashboard, &sender);
        let task = service
            .create(TaskInput {
                name: "Nike Air Max".to_string(),
                price: 1.25,
                market_value: 120.0,
            })
            .await
            .unwrap();

        let done = service.complete_task("u1", &task.id, None).await.unwrap();
        assert_eq!(done.reward, 1.25);
        assert_eq!(done.balance, 1.25);
        assert_eq!(done.task.completions, 1);
        assert_eq!(done.task.total_paid, 1.25);

        let stats = dashboard.get("u1").await.unwrap();
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.total_tasks, 1);
        assert_eq!(stats.daily_earnings, 1.25);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(matches!(first.event, PushEvent::TaskCompleted { .. }));
        assert!(matches!(second.event, PushEvent::RewardEarned { .. }));
    }

    #[tokio::test]
    async fn inactive_task_cannot_be_completed() {
        let tasks = TaskRepository::new();
        let users = UserRepository::new();
        let dashboard = DashboardRepository::new();
        let (sender, _rx) = mpsc::unbounded_channel();
        users.create(user("u1")).await.unwrap();
        let service = TaskService::new(&tasks, &users, &dashboard, &sender);
        let task = service
            .create(TaskInput {
                name: "Adidas".to_string(),
                price: 1.0,
                market_value: 90.0,
            })
            .await
            .unwrap();
        service.toggle_status(&task.id).await.unwrap();

        let err = service.complete_task("u1", &task.id, None).await.unwrap_err();
        assert_eq!(err, AppError::TaskInactive);
        assert_eq!(users.get_by_id("u1").await.unwrap().balance, 0.0);
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let tasks = TaskRepository::new();
        let users = UserRepository::new();
        let dashboard = DashboardRepository::new();
        let (sender, _rx) = mpsc::unbounded_channel();
        let service = TaskService::new(&tasks, &users, &dashboard, &sender);
        for name in ["Nike Air", "Puma Suede", "nike zoom"] {
            service
                .create(TaskInput {
                    name: name.to_string(),
                    price: 1.0,
                    market_value: 10.0,
                })
                .await
                .unwrap();
        }
        assert_eq!(service.list_all(Some("NIKE")).await.unwrap().len(), 2);
        assert_eq!(service.list_all(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn matching_game_pays_fixed_reward() {
        let tasks = TaskRepository::new();
        let users = UserRepository::new();
        let dashboard = DashboardRepository::new();
        let (sender, _rx) = mpsc::unbounded_channel();
        users.create(user("u1")).await.unwrap();
        let service = TaskService::new(&tasks, &users, &dashboard, &sender);
        service
            .create(TaskInput {
                name: "Reebok".to_string(),
                price: 0.5,
                market_value: 60.0,
            })
            .await
            .unwrap();
        let done = service
            .play_matching_game("u1", Duration::ZERO, 5.0)
            .await
            .unwrap();
        assert_eq!(done.reward, 5.0);
        assert_eq!(done.balance, 5.0);
    }
}

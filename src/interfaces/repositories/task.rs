use async_trait::async_trait;

use crate::database::repository_traits::Mutation;
use crate::entities::task::{Task, TaskStatus};
use crate::middleware::error::AppResult;

#[async_trait]
pub trait TaskRepositoryInterface {
    async fn create(&self, task: Task) -> AppResult<Task>;
    async fn get_by_id(&self, id: &str) -> AppResult<Task>;
    async fn list(&self, status: Option<TaskStatus>) -> AppResult<Vec<Task>>;
    async fn update(&self, id: &str, mutation: Mutation<Task>) -> AppResult<Task>;
}

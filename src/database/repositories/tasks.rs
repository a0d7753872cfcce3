use async_trait::async_trait;

use crate::database::repository_impl::Repository;
use crate::database::repository_traits::Mutation;
use crate::entities::task::{Task, TaskStatus};
use crate::interfaces::repositories::task::TaskRepositoryInterface;
use crate::middleware::error::AppResult;

pub const TABLE_NAME: &str = "task";

#[derive(Debug)]
pub struct TaskRepository {
    table: Repository<Task>,
}

impl TaskRepository {
    pub fn new() -> Self {
        Self {
            table: Repository::new(TABLE_NAME),
        }
    }
}

#[async_trait]
impl TaskRepositoryInterface for TaskRepository {
    async fn create(&self, task: Task) -> AppResult<Task> {
        self.table.create_entity(task).await
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Task> {
        self.table.select_by_id(id).await
    }

    async fn list(&self, status: Option<TaskStatus>) -> AppResult<Vec<Task>> {
        Ok(self
            .table
            .filter(|t| status.map_or(true, |s| t.status == s))
            .await)
    }

    async fn update(&self, id: &str, mutation: Mutation<Task>) -> AppResult<Task> {
        self.table.update_entity(id, mutation).await
    }
}

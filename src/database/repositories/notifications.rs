use async_trait::async_trait;

use crate::database::repository_impl::Repository;
use crate::entities::notification::Notification;
use crate::interfaces::repositories::notification::NotificationRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};

pub const TABLE_NAME: &str = "notification";

#[derive(Debug)]
pub struct NotificationRepository {
    table: Repository<Notification>,
}

impl NotificationRepository {
    pub fn new() -> Self {
        Self {
            table: Repository::new(TABLE_NAME),
        }
    }
}

#[async_trait]
impl NotificationRepositoryInterface for NotificationRepository {
    async fn create(&self, notification: Notification) -> AppResult<Notification> {
        self.table.create_entity(notification).await
    }

    async fn get_by_user(
        &self,
        user_id: &str,
        is_read: Option<bool>,
    ) -> AppResult<Vec<Notification>> {
        let mut items = self
            .table
            .filter(|n| n.user_id == user_id && is_read.map_or(true, |r| n.read == r))
            .await;
        items.reverse();
        Ok(items)
    }

    async fn read(&self, id: &str, user_id: &str) -> AppResult<()> {
        let changed = self
            .table
            .update_where(|n| n.id == id && n.user_id == user_id, |n| n.read = true)
            .await;
        if changed == 0 {
            return Err(AppError::EntityFailIdNotFound {
                ident: format!("{TABLE_NAME}:{id}"),
            });
        }
        Ok(())
    }

    async fn read_all(&self, user_id: &str) -> AppResult<u64> {
        let changed = self
            .table
            .update_where(|n| n.user_id == user_id && !n.read, |n| n.read = true)
            .await;
        Ok(changed as u64)
    }

    async fn get_count(&self, user_id: &str, is_read: Option<bool>) -> AppResult<u64> {
        let count = self
            .table
            .count(|n| n.user_id == user_id && is_read.map_or(true, |r| n.read == r))
            .await;
        Ok(count as u64)
    }
}

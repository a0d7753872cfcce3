use async_trait::async_trait;

use crate::entities::notification::Notification;
use crate::middleware::error::AppResult;

#[async_trait]
pub trait NotificationRepositoryInterface {
    async fn create(&self, notification: Notification) -> AppResult<Notification>;
    /// Newest first.
    async fn get_by_user(&self, user_id: &str, is_read: Option<bool>)
        -> AppResult<Vec<Notification>>;
    async fn read(&self, id: &str, user_id: &str) -> AppResult<()>;
    async fn read_all(&self, user_id: &str) -> AppResult<u64>;
    async fn get_count(&self, user_id: &str, is_read: Option<bool>) -> AppResult<u64>;
}

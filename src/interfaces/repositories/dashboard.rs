use async_trait::async_trait;

use crate::database::repository_traits::Mutation;
use crate::entities::dashboard::DashboardStats;
use crate::middleware::error::AppResult;

#[async_trait]
pub trait DashboardRepositoryInterface {
    /// Users without recorded activity get zeroed stats.
    async fn get(&self, user_id: &str) -> AppResult<DashboardStats>;
    async fn update(&self, user_id: &str, mutation: Mutation<DashboardStats>)
        -> AppResult<DashboardStats>;
}

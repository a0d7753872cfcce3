use async_trait::async_trait;
use dashmap::DashMap;

use crate::database::repository_traits::Mutation;
use crate::entities::dashboard::DashboardStats;
use crate::interfaces::repositories::dashboard::DashboardRepositoryInterface;
use crate::middleware::error::AppResult;

#[derive(Debug)]
pub struct DashboardRepository {
    stats: DashMap<String, DashboardStats>,
}

impl DashboardRepository {
    pub fn new() -> Self {
        Self {
            stats: DashMap::new(),
        }
    }
}

#[async_trait]
impl DashboardRepositoryInterface for DashboardRepository {
    async fn get(&self, user_id: &str) -> AppResult<DashboardStats> {
        Ok(self
            .stats
            .get(user_id)
            .map(|s| s.value().clone())
            .unwrap_or_default())
    }

    async fn update(
        &self,
        user_id: &str,
        mutation: Mutation<DashboardStats>,
    ) -> AppResult<DashboardStats> {
        let mut entry = self.stats.entry(user_id.to_string()).or_default();
        let mut updated = entry.value().clone();
        mutation(&mut updated)?;
        *entry.value_mut() = updated.clone();
        Ok(updated)
    }
}

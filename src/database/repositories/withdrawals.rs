use async_trait::async_trait;
use dashmap::DashSet;

use crate::database::repository_impl::Repository;
use crate::database::repository_traits::Mutation;
use crate::entities::withdrawal::{WithdrawalRequest, WithdrawalStatus};
use crate::interfaces::repositories::withdrawal::WithdrawalRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};

pub const TABLE_NAME: &str = "withdrawal_request";

#[derive(Debug)]
pub struct WithdrawalRepository {
    table: Repository<WithdrawalRequest>,
    in_process: DashSet<String>,
}

impl WithdrawalRepository {
    pub fn new() -> Self {
        Self {
            table: Repository::new(TABLE_NAME),
            in_process: DashSet::new(),
        }
    }
}

#[async_trait]
impl WithdrawalRepositoryInterface for WithdrawalRepository {
    async fn create(&self, request: WithdrawalRequest) -> AppResult<WithdrawalRequest> {
        self.table.create_entity(request).await
    }

    async fn get_by_id(&self, id: &str) -> AppResult<WithdrawalRequest> {
        self.table.select_by_id(id).await
    }

    async fn list(
        &self,
        status: Option<WithdrawalStatus>,
        user_id: Option<&str>,
    ) -> AppResult<Vec<WithdrawalRequest>> {
        Ok(self
            .table
            .filter(|r| {
                status.map_or(true, |s| r.status == s)
                    && user_id.map_or(true, |id| r.user_id == id)
            })
            .await)
    }

    async fn update(
        &self,
        id: &str,
        mutation: Mutation<WithdrawalRequest>,
    ) -> AppResult<WithdrawalRequest> {
        self.table.update_entity(id, mutation).await
    }

    async fn claim(&self, id: &str) -> AppResult<()> {
        if self.in_process.insert(id.to_string()) {
            Ok(())
        } else {
            Err(AppError::WithdrawalInProgress)
        }
    }

    fn release(&self, id: &str) {
        self.in_process.remove(id);
    }
}

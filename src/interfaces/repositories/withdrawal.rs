use async_trait::async_trait;

use crate::database::repository_traits::Mutation;
use crate::entities::withdrawal::{WithdrawalRequest, WithdrawalStatus};
use crate::middleware::error::AppResult;

#[async_trait]
pub trait WithdrawalRepositoryInterface {
    async fn create(&self, request: WithdrawalRequest) -> AppResult<WithdrawalRequest>;
    async fn get_by_id(&self, id: &str) -> AppResult<WithdrawalRequest>;
    async fn list(
        &self,
        status: Option<WithdrawalStatus>,
        user_id: Option<&str>,
    ) -> AppResult<Vec<WithdrawalRequest>>;
    async fn update(
        &self,
        id: &str,
        mutation: Mutation<WithdrawalRequest>,
    ) -> AppResult<WithdrawalRequest>;
    /// Marks a request as being processed; fails with `WithdrawalInProgress` if already claimed.
    async fn claim(&self, id: &str) -> AppResult<()>;
    /// Synchronous so a drop guard can release the claim.
    fn release(&self, id: &str);
}

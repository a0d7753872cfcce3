use async_trait::async_trait;

use crate::database::repository_traits::Mutation;
use crate::entities::user::User;
use crate::middleware::error::AppResult;

#[async_trait]
pub trait UserRepositoryInterface {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn get_by_id(&self, id: &str) -> AppResult<User>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn get_by_referral_code(&self, code: &str) -> AppResult<Option<User>>;
    /// Case-insensitive match on name or email; `None` lists everyone.
    async fn search(&self, term: Option<&str>) -> AppResult<Vec<User>>;
    async fn update(&self, id: &str, mutation: Mutation<User>) -> AppResult<User>;
}

use async_trait::async_trait;

use crate::database::repository_impl::Repository;
use crate::database::repository_traits::Mutation;
use crate::entities::user::User;
use crate::interfaces::repositories::user::UserRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};

pub const TABLE_NAME: &str = "user";

#[derive(Debug)]
pub struct UserRepository {
    table: Repository<User>,
}

impl UserRepository {
    pub fn new() -> Self {
        Self {
            table: Repository::new(TABLE_NAME),
        }
    }
}

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let email = user.email.to_lowercase();
        if self
            .table
            .find(|u| u.email.to_lowercase() == email)
            .await
            .is_some()
        {
            return Err(AppError::EmailTaken);
        }
        self.table.create_entity(user).await
    }

    async fn get_by_id(&self, id: &str) -> AppResult<User> {
        self.table.select_by_id(id).await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self.table.find(|u| u.email.to_lowercase() == email).await)
    }

    async fn get_by_referral_code(&self, code: &str) -> AppResult<Option<User>> {
        Ok(self.table.find(|u| u.referral_code == code).await)
    }

    async fn search(&self, term: Option<&str>) -> AppResult<Vec<User>> {
        let term = term.map(|t| t.trim().to_lowercase()).unwrap_or_default();
        Ok(self
            .table
            .filter(|u| {
                term.is_empty()
                    || u.name.to_lowercase().contains(&term)
                    || u.email.to_lowercase().contains(&term)
            })
            .await)
    }

    async fn update(&self, id: &str, mutation: Mutation<User>) -> AppResult<User> {
        self.table.update_entity(id, mutation).await
    }
}

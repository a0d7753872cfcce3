use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::Sender;
use tracing::{info, warn};
use validator::Validate;

use crate::entities::exchange_rate::BASE_CURRENCY;
use crate::entities::user::{User, UserRole, UserStatus};
use crate::interfaces::repositories::dashboard::DashboardRepositoryInterface;
use crate::interfaces::repositories::notification::NotificationRepositoryInterface;
use crate::interfaces::repositories::user::UserRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::mw_ctx::AppEvent;
use crate::services::dashboard_service::DashboardService;
use crate::services::user_service::UserService;
use crate::utils::{
    generate::generate_id,
    hash::{hash_password, verify_password},
    jwt::JWT,
    validate_utils::trim_string,
};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct AuthRegisterInput {
    #[serde(deserialize_with = "trim_string")]
    #[validate(length(min = 1, message = "Min 1 character"))]
    pub name: String,
    #[serde(deserialize_with = "trim_string")]
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "Min 6 characters"))]
    pub password: String,
    pub referral_code: Option<String>,
}

/// Empty fields are allowed through so the service can answer with its own message.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct AuthLoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub struct AuthService<'a, U, N, D>
where
    U: UserRepositoryInterface,
    N: NotificationRepositoryInterface,
    D: DashboardRepositoryInterface,
{
    user_repository: &'a U,
    user_service: UserService<'a, U, N>,
    dashboard_service: DashboardService<'a, D>,
    jwt: &'a JWT,
    referral_reward: f64,
}

impl<'a, U, N, D> AuthService<'a, U, N, D>
where
    U: UserRepositoryInterface,
    N: NotificationRepositoryInterface,
    D: DashboardRepositoryInterface,
{
    pub fn new(
        user_repository: &'a U,
        notification_repository: &'a N,
        dashboard_repository: &'a D,
        event_sender: &'a Sender<AppEvent>,
        jwt: &'a JWT,
        referral_reward: f64,
    ) -> Self {
        Self {
            user_repository,
            user_service: UserService::new(user_repository, notification_repository, event_sender),
            dashboard_service: DashboardService::new(dashboard_repository),
            jwt,
            referral_reward,
        }
    }

    pub async fn login(&self, input: AuthLoginInput) -> AppResult<(String, User)> {
        let email = input.email.trim();
        if email.is_empty() || input.password.is_empty() {
            return Err(AppError::Generic {
                description: "Please enter your email and password".to_string(),
            });
        }

        let user = self
            .user_repository
            .get_by_email(email)
            .await?
            .ok_or(AppError::Generic {
                description: "No user found with this email".to_string(),
            })?;

        if !verify_password(&user.password_hash, &input.password) {
            warn!("->> failed login for {}", user.id);
            return Err(AppError::Generic {
                description: "Invalid password".to_string(),
            });
        }

        if user.status == UserStatus::Banned {
            warn!("->> banned user {} tried to log in", user.id);
            return Err(AppError::UserBanned);
        }

        let token = self.build_session(&user)?;
        info!("->> user {} logged in as {}", user.id, user.role);
        Ok((token, user))
    }

    pub async fn register(&self, input: AuthRegisterInput) -> AppResult<(String, User)> {
        let user = self.create_user(input, UserRole::User).await?;
        let token = self.build_session(&user)?;
        Ok((token, user))
    }

    /// Creates the account and credits the referrer when a referral code was given.
    pub async fn create_user(&self, input: AuthRegisterInput, role: UserRole) -> AppResult<User> {
        input.validate()?;

        let referrer = match input
            .referral_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            Some(code) => Some(
                self.user_repository
                    .get_by_referral_code(&code.to_uppercase())
                    .await?
                    .ok_or(AppError::InvalidReferralCode)?,
            ),
            None => None,
        };

        if self
            .user_repository
            .get_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(AppError::EmailTaken);
        }

        let user = self
            .user_repository
            .create(User {
                id: generate_id(),
                name: input.name,
                email: input.email.to_lowercase(),
                password_hash: hash_password(&input.password)?,
                role,
                status: UserStatus::Active,
                referral_code: self.user_service.generate_referral_code().await?,
                referred_by: referrer.as_ref().map(|r| r.id.clone()),
                referral_count: 0,
                referral_rewards: 0.0,
                tasks_completed: 0,
                total_earnings: 0.0,
                balance: 0.0,
                preferred_currency: BASE_CURRENCY.to_string(),
                payments: vec![],
                join_date: Utc::now(),
            })
            .await?;

        if let Some(referrer) = referrer {
            self.user_service
                .add_referral_reward(&referrer.id, self.referral_reward)
                .await?;
            self.dashboard_service
                .update_commissions(&referrer.id, self.referral_reward)
                .await?;
        }

        info!("->> registered {} ({})", user.id, user.role);
        Ok(user)
    }

    fn build_session(&self, user: &User) -> AppResult<String> {
        self.jwt
            .create_session(&user.id, user.role)
            .map_err(|e| AppError::AuthFailJwtInvalid { source: e })
    }
}

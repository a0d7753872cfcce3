use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::broadcast::Sender;
use tracing::info;

use crate::database::repository_traits::mutation;
use crate::entities::payment::{Payment, PaymentMethod};
use crate::entities::user::User;
use crate::interfaces::repositories::notification::NotificationRepositoryInterface;
use crate::interfaces::repositories::user::UserRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::mw_ctx::AppEvent;
use crate::services::notification_service::NotificationService;
use crate::utils::generate::{generate_id, generate_referral_code};

pub const USER_STORAGE_KEY: &str = "user-storage";
const REFERRAL_CODE_ATTEMPTS: usize = 16;

pub struct UserService<'a, U, N>
where
    U: UserRepositoryInterface,
    N: NotificationRepositoryInterface,
{
    user_repository: &'a U,
    notification_service: NotificationService<'a, N>,
}

impl<'a, U, N> UserService<'a, U, N>
where
    U: UserRepositoryInterface,
    N: NotificationRepositoryInterface,
{
    pub fn new(
        user_repository: &'a U,
        notification_repository: &'a N,
        event_sender: &'a Sender<AppEvent>,
    ) -> Self {
        Self {
            user_repository,
            notification_service: NotificationService::new(notification_repository, event_sender),
        }
    }

    pub async fn current_user(&self, user_id: &str) -> AppResult<User> {
        self.user_repository.get_by_id(user_id).await
    }

    /// Fresh 8-character code not held by any user.
    pub async fn generate_referral_code(&self) -> AppResult<String> {
        for _ in 0..REFERRAL_CODE_ATTEMPTS {
            let code = generate_referral_code();
            if self
                .user_repository
                .get_by_referral_code(&code)
                .await?
                .is_none()
            {
                return Ok(code);
            }
        }
        Err(AppError::Generic {
            description: "Could not generate a unique referral code".to_string(),
        })
    }

    /// Count and cumulative rewards change in the same update.
    pub async fn add_referral_reward(&self, user_id: &str, amount: f64) -> AppResult<User> {
        let user = self
            .user_repository
            .update(
                user_id,
                mutation(move |u: &mut User| {
                    u.add_referral_reward(amount);
                    Ok(())
                }),
            )
            .await?;
        info!(
            "->> referral reward {amount} for {user_id}, count={}",
            user.referral_count
        );
        Ok(user)
    }

    pub fn referral_link(public_url: &str, user: &User) -> String {
        if user.referral_code.is_empty() {
            return String::new();
        }
        format!("{public_url}/auth/register?ref={}", user.referral_code)
    }

    /// The profile in the layout clients keep in local storage.
    pub fn storage_snapshot(user: &User) -> Value {
        json!({
            "name": USER_STORAGE_KEY,
            "state": {
                "currentUser": {
                    "id": user.id,
                    "name": user.name,
                    "email": user.email,
                    "referralCode": user.referral_code,
                    "referralCount": user.referral_count,
                    "referralRewards": user.referral_rewards,
                }
            },
            "version": 0
        })
    }

    pub async fn search(&self, term: Option<&str>) -> AppResult<Vec<User>> {
        self.user_repository.search(term).await
    }

    pub async fn toggle_status(&self, user_id: &str) -> AppResult<User> {
        let user = self
            .user_repository
            .update(
                user_id,
                mutation(|u: &mut User| {
                    if u.is_admin() {
                        return Err(AppError::Forbidden);
                    }
                    u.status = u.status.toggled();
                    Ok(())
                }),
            )
            .await?;
        info!("->> user {user_id} status is now {}", user.status);
        self.notification_service
            .on_user_status_changed(&user.id, user.status)
            .await?;
        Ok(user)
    }

    /// Manual credit: appended to the history and added to earnings and balance.
    pub async fn add_payment(
        &self,
        user_id: &str,
        amount: f64,
        currency: &str,
        method: PaymentMethod,
        notes: Option<String>,
    ) -> AppResult<Payment> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(AppError::Generic {
                description: "Amount must be greater than zero".to_string(),
            });
        }
        let payment = Payment {
            id: generate_id(),
            user_id: user_id.to_string(),
            amount,
            currency: currency.to_string(),
            method,
            notes: notes.filter(|n| !n.trim().is_empty()),
            date: Utc::now().date_naive(),
        };
        let record = payment.clone();
        self.user_repository
            .update(
                user_id,
                mutation(move |u: &mut User| {
                    u.credit(record.amount);
                    u.payments.push(record);
                    Ok(())
                }),
            )
            .await?;
        info!("->> payment {amount} {currency} via {method} added for {user_id}");
        Ok(payment)
    }

    pub async fn payments(&self, user_id: &str) -> AppResult<Vec<Payment>> {
        Ok(self.user_repository.get_by_id(user_id).await?.payments)
    }
}

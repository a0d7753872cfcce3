use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::Sender;
use tracing::{info, warn};
use validator::{Validate, ValidationError};

use crate::database::repository_traits::mutation;
use crate::entities::payment_settings::PaymentMethodSettings;
use crate::entities::user::{User, UserStatus};
use crate::entities::withdrawal::{
    MobileRail, PayoutDestination, WithdrawalRequest, WithdrawalStatus,
};
use crate::interfaces::payment::PayoutGatewayInterface;
use crate::interfaces::repositories::exchange_rate::ExchangeRateRepositoryInterface;
use crate::interfaces::repositories::notification::NotificationRepositoryInterface;
use crate::interfaces::repositories::payment_settings::PaymentSettingsRepositoryInterface;
use crate::interfaces::repositories::user::UserRepositoryInterface;
use crate::interfaces::repositories::withdrawal::WithdrawalRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::mw_ctx::AppEvent;
use crate::services::currency_service::CurrencyService;
use crate::services::notification_service::NotificationService;
use crate::utils::generate::generate_id;
use crate::utils::validate_utils::{validate_mobile_number, validate_wallet_address};

/// Mobile rails pay out in taka, wallets in USDT.
pub const MOBILE_PAYOUT_CURRENCY: &str = "BDT";
pub const WALLET_PAYOUT_CURRENCY: &str = "USDT";

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct WithdrawalInput {
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero"))]
    pub amount: f64,
    #[validate(custom(function = validate_destination))]
    pub destination: PayoutDestination,
}

fn validate_destination(destination: &PayoutDestination) -> Result<(), ValidationError> {
    match destination {
        PayoutDestination::Mobile { phone_number, .. } => validate_mobile_number(phone_number),
        PayoutDestination::Wallet { wallet_address } => validate_wallet_address(wallet_address),
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PaymentMethodUpdate {
    pub method: MobileRail,
    pub enabled: Option<bool>,
    #[validate(custom(function = validate_mobile_number))]
    pub merchant_number: Option<String>,
}

pub struct WithdrawalService<'a, W, U, S, R, N>
where
    W: WithdrawalRepositoryInterface,
    U: UserRepositoryInterface,
    S: PaymentSettingsRepositoryInterface,
    R: ExchangeRateRepositoryInterface,
    N: NotificationRepositoryInterface,
{
    withdrawal_repository: &'a W,
    user_repository: &'a U,
    settings_repository: &'a S,
    currency_service: CurrencyService<'a, R>,
    notification_service: NotificationService<'a, N>,
    payout_gateway: &'a (dyn PayoutGatewayInterface + Send + Sync),
}

impl<'a, W, U, S, R, N> WithdrawalService<'a, W, U, S, R, N>
where
    W: WithdrawalRepositoryInterface,
    U: UserRepositoryInterface,
    S: PaymentSettingsRepositoryInterface,
    R: ExchangeRateRepositoryInterface,
    N: NotificationRepositoryInterface,
{
    pub fn new(
        withdrawal_repository: &'a W,
        user_repository: &'a U,
        settings_repository: &'a S,
        rate_repository: &'a R,
        notification_repository: &'a N,
        event_sender: &'a Sender<AppEvent>,
        payout_gateway: &'a (dyn PayoutGatewayInterface + Send + Sync),
    ) -> Self {
        Self {
            withdrawal_repository,
            user_repository,
            settings_repository,
            currency_service: CurrencyService::new(rate_repository),
            notification_service: NotificationService::new(notification_repository, event_sender),
            payout_gateway,
        }
    }

    pub async fn payment_methods(&self) -> AppResult<Vec<PaymentMethodSettings>> {
        self.settings_repository.get_all().await
    }

    pub async fn update_payment_method(
        &self,
        update: PaymentMethodUpdate,
    ) -> AppResult<PaymentMethodSettings> {
        update.validate()?;
        let method = update.method;
        let settings = self
            .settings_repository
            .update(
                method,
                mutation(move |s: &mut PaymentMethodSettings| {
                    if let Some(enabled) = update.enabled {
                        s.enabled = enabled;
                    }
                    if let Some(number) = update.merchant_number {
                        s.merchant_number = number;
                    }
                    Ok(())
                }),
            )
            .await?;
        info!("->> payment method {method} enabled={}", settings.enabled);
        Ok(settings)
    }

    /// Balance not yet promised to the user's other pending requests.
    async fn available_balance(&self, user: &User) -> AppResult<f64> {
        let pending: f64 = self
            .withdrawal_repository
            .list(Some(WithdrawalStatus::Pending), Some(&user.id))
            .await?
            .iter()
            .map(|r| r.amount)
            .sum();
        Ok(user.balance - pending)
    }

    pub async fn request_withdrawal(
        &self,
        user_id: &str,
        input: WithdrawalInput,
    ) -> AppResult<WithdrawalRequest> {
        input.validate()?;

        if let PayoutDestination::Mobile { method, .. } = &input.destination {
            let settings = self.settings_repository.get(*method).await?;
            if !settings.enabled {
                return Err(AppError::PaymentMethodDisabled {
                    method: method.to_string(),
                });
            }
        }

        let user = self.user_repository.get_by_id(user_id).await?;
        if user.status == UserStatus::Banned {
            return Err(AppError::UserBanned);
        }
        if input.amount > self.available_balance(&user).await? {
            return Err(AppError::BalanceTooLow);
        }

        let now = Utc::now();
        let request = self
            .withdrawal_repository
            .create(WithdrawalRequest {
                id: generate_id(),
                user_id: user.id.clone(),
                user_name: user.name.clone(),
                amount: input.amount,
                destination: input.destination,
                status: WithdrawalStatus::Pending,
                note: None,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(
            "->> withdrawal {} of {} via {} requested by {user_id}",
            request.id,
            request.amount,
            request.destination.method_name()
        );
        self.notification_service
            .on_withdrawal_submitted(&request)
            .await?;
        Ok(request)
    }

    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<WithdrawalRequest>> {
        self.withdrawal_repository.list(None, Some(user_id)).await
    }

    pub async fn list(&self, status: Option<WithdrawalStatus>) -> AppResult<Vec<WithdrawalRequest>> {
        self.withdrawal_repository.list(status, None).await
    }

    /// Moves a pending request to approved or rejected. Concurrent updates of the
    /// same request fail with `WithdrawalInProgress`.
    pub async fn update_status(
        &self,
        withdrawal_id: &str,
        status: WithdrawalStatus,
        note: Option<String>,
    ) -> AppResult<WithdrawalRequest> {
        self.withdrawal_repository.claim(withdrawal_id).await?;
        let _claim = ClaimGuard {
            repository: self.withdrawal_repository,
            id: withdrawal_id,
        };
        self.apply_status(withdrawal_id, status, note).await
    }

    async fn apply_status(
        &self,
        withdrawal_id: &str,
        status: WithdrawalStatus,
        note: Option<String>,
    ) -> AppResult<WithdrawalRequest> {
        let request = self.withdrawal_repository.get_by_id(withdrawal_id).await?;
        request.status.transition(status)?;

        match status {
            WithdrawalStatus::Rejected => self.reject(request, note).await,
            _ => self.approve(request).await,
        }
    }

    async fn reject(
        &self,
        request: WithdrawalRequest,
        note: Option<String>,
    ) -> AppResult<WithdrawalRequest> {
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let updated = self
            .withdrawal_repository
            .update(
                &request.id,
                mutation(move |r: &mut WithdrawalRequest| {
                    r.status = r.status.transition(WithdrawalStatus::Rejected)?;
                    r.note = note;
                    r.updated_at = Utc::now();
                    Ok(())
                }),
            )
            .await?;
        info!("->> withdrawal {} rejected", updated.id);
        self.notification_service
            .on_withdrawal_rejected(&updated)
            .await?;
        Ok(updated)
    }

    async fn approve(&self, request: WithdrawalRequest) -> AppResult<WithdrawalRequest> {
        let (payout_amount, currency) = match &request.destination {
            PayoutDestination::Mobile { .. } => (
                self.currency_service
                    .convert(request.amount, "USD", MOBILE_PAYOUT_CURRENCY)
                    .await?,
                MOBILE_PAYOUT_CURRENCY,
            ),
            PayoutDestination::Wallet { .. } => (request.amount, WALLET_PAYOUT_CURRENCY),
        };

        let amount = request.amount;
        let user = self.user_repository.get_by_id(&request.user_id).await?;
        if user.balance < amount {
            return Err(AppError::BalanceTooLow);
        }

        // nothing is written until the transfer succeeds
        self.payout_gateway
            .send_money(&request.id, &request.destination, payout_amount, currency)
            .await
            .map_err(|description| {
                warn!("->> payout for withdrawal {} failed: {description}", request.id);
                AppError::PayoutFailed { description }
            })?;

        self.user_repository
            .update(
                &request.user_id,
                mutation(move |u: &mut User| {
                    if u.balance < amount {
                        return Err(AppError::BalanceTooLow);
                    }
                    u.balance -= amount;
                    Ok(())
                }),
            )
            .await?;
        let updated = self
            .withdrawal_repository
            .update(
                &request.id,
                mutation(|r: &mut WithdrawalRequest| {
                    r.status = r.status.transition(WithdrawalStatus::Approved)?;
                    r.updated_at = Utc::now();
                    Ok(())
                }),
            )
            .await?;
        info!(
            "->> withdrawal {} approved, {payout_amount} {currency} sent",
            updated.id
        );
        self.notification_service
            .on_withdrawal_approved(&updated, payout_amount, currency)
            .await?;
        Ok(updated)
    }
}

/// Releases the in-process claim even when the update future is dropped mid-payout.
struct ClaimGuard<'r, W: WithdrawalRepositoryInterface> {
    repository: &'r W,
    id: &'r str,
}

impl<W: WithdrawalRepositoryInterface> Drop for ClaimGuard<'_, W> {
    fn drop(&mut self) {
        self.repository.release(self.id);
    }
}

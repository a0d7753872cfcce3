use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{
    database::repositories::{notifications::NotificationRepository, users::UserRepository},
    entities::{
        dashboard::PlatformStats,
        exchange_rate::ExchangeRate,
        payment::{Payment, PaymentMethod},
        payment_settings::PaymentMethodSettings,
        task::Task,
        user::{User, UserRole},
        withdrawal::{WithdrawalRequest, WithdrawalStatus},
    },
    middleware::{
        auth_with_admin_access::AuthWithAdminAccess,
        error::{AppError, CtxError, CtxResult},
        mw_ctx::CtxState,
        utils::extractor_utils::JsonOrFormValidated,
    },
    services::{
        currency_service::CurrencyService,
        dashboard_service::PlatformStatsService,
        live_update::{publish, PushEvent},
        task_service::TaskInput,
        user_service::UserService,
        withdrawal_service::PaymentMethodUpdate,
    },
    utils::validate_utils::trim_string,
};

use super::{dashboard::withdrawal_service, tasks::task_service};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/admin", get(get_overview))
        .route("/admin/tasks", get(get_tasks).post(create_task))
        .route("/admin/tasks/:task_id/status", post(toggle_task))
        .route("/admin/currencies/refresh", post(refresh_rates))
        .route("/admin/currencies/:code", put(set_rate))
        .route("/admin/currencies/:code/toggle", post(toggle_currency))
        .route(
            "/admin/settings/payment-methods",
            get(get_payment_methods).put(update_payment_method),
        )
        .route("/admin/withdrawals", get(get_withdrawals))
        .route("/admin/withdrawals/:withdrawal_id/approve", post(approve_withdrawal))
        .route("/admin/withdrawals/:withdrawal_id/reject", post(reject_withdrawal))
        .route("/admin/users", get(get_users))
        .route("/admin/users/:user_id/status", post(toggle_user))
        .route(
            "/admin/users/:user_id/payments",
            get(get_payments).post(add_payment),
        )
        .route("/admin/broadcast", post(broadcast))
}

fn user_service(state: &CtxState) -> UserService<'_, UserRepository, NotificationRepository> {
    UserService::new(&state.db.users, &state.db.notifications, &state.event_sender)
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

async fn get_overview(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
) -> CtxResult<Json<PlatformStats>> {
    let stats = PlatformStatsService::new(&state.db.users, &state.db.tasks, &state.db.withdrawals)
        .platform_stats()
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(stats))
}

async fn get_tasks(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Query(query): Query<SearchQuery>,
) -> CtxResult<Json<Vec<Task>>> {
    let tasks = task_service(&state)
        .list_all(query.search.as_deref())
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    JsonOrFormValidated(input): JsonOrFormValidated<TaskInput>,
) -> CtxResult<Response> {
    let task = task_service(&state)
        .create(input)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok((StatusCode::CREATED, Json(task)).into_response())
}

async fn toggle_task(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Path(task_id): Path<String>,
) -> CtxResult<Json<Task>> {
    let task = task_service(&state)
        .toggle_status(&task_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(task))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RateInput {
    #[validate(range(exclusive_min = 0.0, message = "Rate must be greater than zero"))]
    pub rate: f64,
    pub enabled: bool,
}

async fn set_rate(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Path(code): Path<String>,
    JsonOrFormValidated(input): JsonOrFormValidated<RateInput>,
) -> CtxResult<Json<ExchangeRate>> {
    let rate = CurrencyService::new(&state.db.exchange_rates)
        .set_rate(&code.to_uppercase(), input.rate, input.enabled)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(rate))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ToggleInput {
    pub enabled: bool,
}

async fn toggle_currency(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Path(code): Path<String>,
    JsonOrFormValidated(input): JsonOrFormValidated<ToggleInput>,
) -> CtxResult<Json<ExchangeRate>> {
    let rate = CurrencyService::new(&state.db.exchange_rates)
        .toggle(&code.to_uppercase(), input.enabled)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(rate))
}

async fn refresh_rates(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
) -> CtxResult<Json<Vec<ExchangeRate>>> {
    let rates = CurrencyService::new(&state.db.exchange_rates)
        .refresh(state.rate_provider.as_ref())
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(rates))
}

async fn get_payment_methods(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
) -> CtxResult<Json<Vec<PaymentMethodSettings>>> {
    let methods = withdrawal_service(&state)
        .payment_methods()
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(methods))
}

async fn update_payment_method(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Json(update): Json<PaymentMethodUpdate>,
) -> CtxResult<Json<PaymentMethodSettings>> {
    let settings = withdrawal_service(&state)
        .update_payment_method(update)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(settings))
}

#[derive(Debug, Deserialize)]
struct WithdrawalsQuery {
    status: Option<WithdrawalStatus>,
}

async fn get_withdrawals(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Query(query): Query<WithdrawalsQuery>,
) -> CtxResult<Json<Vec<WithdrawalRequest>>> {
    let requests = withdrawal_service(&state)
        .list(query.status)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(requests))
}

async fn approve_withdrawal(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Path(withdrawal_id): Path<String>,
) -> CtxResult<Json<WithdrawalRequest>> {
    // Detached so a closed connection can not interrupt a payout after the transfer.
    let task_state = state.clone();
    let request = tokio::spawn(async move {
        withdrawal_service(&task_state)
            .update_status(&withdrawal_id, WithdrawalStatus::Approved, None)
            .await
    })
    .await
    .map_err(|err| AppError::Generic {
        description: err.to_string(),
    })
    .and_then(|res| res)
    .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(request))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RejectInput {
    #[serde(default)]
    pub note: Option<String>,
}

async fn reject_withdrawal(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Path(withdrawal_id): Path<String>,
    JsonOrFormValidated(input): JsonOrFormValidated<RejectInput>,
) -> CtxResult<Json<WithdrawalRequest>> {
    let request = withdrawal_service(&state)
        .update_status(&withdrawal_id, WithdrawalStatus::Rejected, input.note)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(request))
}

async fn get_users(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Query(query): Query<SearchQuery>,
) -> CtxResult<Json<Vec<User>>> {
    let users = user_service(&state)
        .search(query.search.as_deref())
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(users))
}

async fn toggle_user(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Path(user_id): Path<String>,
) -> CtxResult<Json<User>> {
    let user = user_service(&state)
        .toggle_status(&user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(user))
}

async fn get_payments(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Path(user_id): Path<String>,
) -> CtxResult<Json<Vec<Payment>>> {
    let payments = user_service(&state)
        .payments(&user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(payments))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PaymentInput {
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero"))]
    pub amount: f64,
    #[serde(default = "default_payment_currency")]
    pub currency: String,
    #[serde(default = "default_payment_method")]
    pub method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_payment_currency() -> String {
    "USD".to_string()
}

fn default_payment_method() -> PaymentMethod {
    PaymentMethod::Manual
}

async fn add_payment(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Path(user_id): Path<String>,
    JsonOrFormValidated(input): JsonOrFormValidated<PaymentInput>,
) -> CtxResult<Response> {
    let payment = user_service(&state)
        .add_payment(&user_id, input.amount, &input.currency, input.method, input.notes)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok((StatusCode::CREATED, Json(payment)).into_response())
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BroadcastInput {
    #[serde(deserialize_with = "trim_string")]
    #[validate(length(min = 1, message = "Min 1 character"))]
    pub message: String,
    #[serde(default)]
    pub user_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BroadcastView {
    pub receivers: usize,
}

/// Pushes an admin update to the listed users, or to every regular user.
async fn broadcast(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithAdminAccess,
    Json(input): Json<BroadcastInput>,
) -> CtxResult<Json<BroadcastView>> {
    input
        .validate()
        .map_err(CtxError::from(&auth_data.ctx))?;
    let receivers = match input.user_ids {
        Some(ids) => ids,
        None => user_service(&state)
            .search(None)
            .await
            .map_err(CtxError::from(&auth_data.ctx))?
            .into_iter()
            .filter(|u| u.role == UserRole::User)
            .map(|u| u.id)
            .collect(),
    };
    let count = receivers.len();
    publish(
        &state.push_sender,
        &auth_data.user_id,
        receivers,
        PushEvent::AdminUpdate {
            message: input.message,
        },
    );
    info!("->> admin update sent to {count} users");
    Ok(Json(BroadcastView { receivers: count }))
}

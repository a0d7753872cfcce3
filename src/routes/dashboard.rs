use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{
    database::repositories::{
        exchange_rates::ExchangeRateRepository, notifications::NotificationRepository,
        payment_settings::PaymentSettingsRepository, users::UserRepository,
        withdrawals::WithdrawalRepository,
    },
    entities::{dashboard::DashboardStats, payment_settings::PaymentMethodSettings, withdrawal::WithdrawalRequest},
    interfaces::repositories::user::UserRepositoryInterface,
    middleware::{
        auth_with_login_access::AuthWithLoginAccess,
        error::{CtxError, CtxResult},
        mw_ctx::CtxState,
    },
    services::{
        dashboard_service::DashboardService,
        withdrawal_service::{WithdrawalInput, WithdrawalService},
    },
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route(
            "/dashboard/withdrawals",
            get(get_withdrawals).post(request_withdrawal),
        )
}

pub(crate) fn withdrawal_service(
    state: &CtxState,
) -> WithdrawalService<
    '_,
    WithdrawalRepository,
    UserRepository,
    PaymentSettingsRepository,
    ExchangeRateRepository,
    NotificationRepository,
> {
    WithdrawalService::new(
        &state.db.withdrawals,
        &state.db.users,
        &state.db.payment_settings,
        &state.db.exchange_rates,
        &state.db.notifications,
        &state.event_sender,
        state.payout_gateway.as_ref(),
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub balance: f64,
    pub preferred_currency: String,
    pub payment_methods: Vec<PaymentMethodSettings>,
}

async fn get_dashboard(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<DashboardView>> {
    let ctx = &auth_data.ctx;
    let user = state
        .db
        .users
        .get_by_id(&auth_data.user_id)
        .await
        .map_err(CtxError::from(ctx))?;
    let stats = DashboardService::new(&state.db.dashboard)
        .get(&user.id)
        .await
        .map_err(CtxError::from(ctx))?;
    let payment_methods = withdrawal_service(&state)
        .payment_methods()
        .await
        .map_err(CtxError::from(ctx))?
        .into_iter()
        .filter(|m| m.enabled)
        .collect();

    Ok(Json(DashboardView {
        stats,
        balance: user.balance,
        preferred_currency: user.preferred_currency,
        payment_methods,
    }))
}

async fn get_withdrawals(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<Vec<WithdrawalRequest>>> {
    let requests = withdrawal_service(&state)
        .list_for_user(&auth_data.user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(requests))
}

async fn request_withdrawal(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Json(input): Json<WithdrawalInput>,
) -> CtxResult<Response> {
    let request = withdrawal_service(&state)
        .request_withdrawal(&auth_data.user_id, input)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok((StatusCode::CREATED, Json(request)).into_response())
}

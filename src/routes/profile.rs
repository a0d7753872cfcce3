use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::{
    database::repositories::{notifications::NotificationRepository, users::UserRepository},
    entities::user::User,
    middleware::{
        auth_with_login_access::AuthWithLoginAccess,
        error::{CtxError, CtxResult},
        mw_ctx::CtxState,
        utils::extractor_utils::JsonOrFormValidated,
    },
    services::{currency_service::CurrencyService, user_service::UserService},
    utils::validate_utils::validate_currency_code,
};

type ProfileService<'a> = UserService<'a, UserRepository, NotificationRepository>;

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile/storage", get(get_storage))
        .route("/profile/currency", patch(set_currency))
        .route("/rewards", get(get_rewards))
}

fn user_service(state: &CtxState) -> ProfileService<'_> {
    UserService::new(&state.db.users, &state.db.notifications, &state.event_sender)
}

async fn get_profile(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<User>> {
    let user = user_service(&state)
        .current_user(&auth_data.user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(user))
}

async fn get_storage(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<Value>> {
    let user = user_service(&state)
        .current_user(&auth_data.user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(ProfileService::storage_snapshot(&user)))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CurrencyInput {
    #[validate(custom(function = validate_currency_code))]
    pub currency: String,
}

async fn set_currency(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    JsonOrFormValidated(input): JsonOrFormValidated<CurrencyInput>,
) -> CtxResult<Json<User>> {
    let user = CurrencyService::new(&state.db.exchange_rates)
        .set_selected_currency(&state.db.users, &auth_data.user_id, &input.currency)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(user))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RewardsView {
    pub referral_code: String,
    pub referral_link: String,
    pub referral_count: u32,
    pub referral_rewards: f64,
    pub total_earnings: f64,
    pub balance: f64,
}

async fn get_rewards(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<RewardsView>> {
    let user = user_service(&state)
        .current_user(&auth_data.user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(RewardsView {
        referral_link: ProfileService::referral_link(&state.public_url, &user),
        referral_code: user.referral_code,
        referral_count: user.referral_count,
        referral_rewards: user.referral_rewards,
        total_earnings: user.total_earnings,
        balance: user.balance,
    }))
}

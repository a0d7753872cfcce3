use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_cookies::{Cookie, Cookies};

use crate::{
    entities::user::{User, UserRole},
    interfaces::repositories::user::UserRepositoryInterface,
    middleware::{
        auth_with_login_access::AuthWithLoginAccess,
        ctx::Ctx,
        error::{CtxError, CtxResult},
        mw_ctx::{CtxState, JWT_KEY},
        utils::extractor_utils::JsonOrFormValidated,
    },
    services::auth_service::{AuthLoginInput, AuthRegisterInput, AuthService},
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
}

fn auth_service(
    state: &CtxState,
) -> AuthService<
    '_,
    crate::database::repositories::users::UserRepository,
    crate::database::repositories::notifications::NotificationRepository,
    crate::database::repositories::dashboard::DashboardRepository,
> {
    AuthService::new(
        &state.db.users,
        &state.db.notifications,
        &state.db.dashboard,
        &state.event_sender,
        &state.jwt,
        state.referral_reward,
    )
}

fn set_session_cookie(cookies: &Cookies, token: String) {
    cookies.add(
        Cookie::build((JWT_KEY, token))
            .path("/")
            .http_only(true)
            .build(),
    );
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

async fn login(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    cookies: Cookies,
    JsonOrFormValidated(payload): JsonOrFormValidated<AuthLoginInput>,
) -> CtxResult<Response> {
    let (token, user) = auth_service(&state)
        .login(payload)
        .await
        .map_err(CtxError::from(&ctx))?;
    set_session_cookie(&cookies, token.clone());
    Ok((StatusCode::OK, Json(AuthResponse { token, user })).into_response())
}

async fn register(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    cookies: Cookies,
    JsonOrFormValidated(payload): JsonOrFormValidated<AuthRegisterInput>,
) -> CtxResult<Response> {
    let (token, user) = auth_service(&state)
        .register(payload)
        .await
        .map_err(CtxError::from(&ctx))?;
    set_session_cookie(&cookies, token.clone());
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })).into_response())
}

async fn logout(cookies: Cookies) -> Response {
    cookies.remove(Cookie::build((JWT_KEY, "")).path("/").build());
    (StatusCode::OK, Json(json!({ "success": true }))).into_response()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub user: User,
    pub role: UserRole,
    pub expires: DateTime<Utc>,
    pub live_update_url: String,
}

async fn session(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<SessionView>> {
    let user = state
        .db
        .users
        .get_by_id(&auth_data.user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;

    Ok(Json(SessionView {
        role: user.role,
        user,
        expires: DateTime::from_timestamp(auth_data.claims.exp as i64, 0).unwrap_or_else(Utc::now),
        live_update_url: state.live_update_url.clone(),
    }))
}

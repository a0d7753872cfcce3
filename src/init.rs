use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use reqwest::StatusCode;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    database::client::Database,
    entities::{
        exchange_rate::{default_rates, ExchangeRate},
        user::UserRole,
    },
    interfaces::repositories::exchange_rate::ExchangeRateRepositoryInterface,
    middleware::{
        error::{AppError, AppResult},
        mw_ctx::CtxState,
        route_guard::route_guard,
    },
    routes::{admin, auth_routes, currencies, dashboard, notifications, pages, profile, tasks},
    services::{
        auth_service::{AuthRegisterInput, AuthService},
        task_service::TaskInput,
    },
};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const USER_EMAIL: &str = "user@example.com";

pub async fn seed_exchange_rates(db: &Database) -> AppResult<()> {
    db.exchange_rates
        .replace_all(
            default_rates()
                .into_iter()
                .map(|(code, rate)| ExchangeRate::new(code, rate))
                .collect(),
        )
        .await
}

/// Admin and regular demo account. Existing accounts are left as they are.
pub async fn seed_users(ctx_state: &CtxState, password: &str) -> AppResult<()> {
    let auth_service = AuthService::new(
        &ctx_state.db.users,
        &ctx_state.db.notifications,
        &ctx_state.db.dashboard,
        &ctx_state.event_sender,
        &ctx_state.jwt,
        ctx_state.referral_reward,
    );

    let accounts = [
        ("Admin", ADMIN_EMAIL, UserRole::Admin),
        ("Demo User", USER_EMAIL, UserRole::User),
    ];
    for (name, email, role) in accounts {
        let res = auth_service
            .create_user(
                AuthRegisterInput {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    referral_code: None,
                },
                role,
            )
            .await;
        match res {
            Ok(user) => info!("->> seeded {role} account {}", user.email),
            Err(AppError::EmailTaken) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

pub async fn seed_tasks(ctx_state: &CtxState) -> AppResult<()> {
    let service = tasks::task_service(ctx_state);
    let mock = [
        ("Dockers Men's Wool Melton Jacket Review", 100.0, 120.0),
        ("Samsonite Backpack Product Test", 200.0, 250.0),
    ];
    for (name, price, market_value) in mock {
        service
            .create(TaskInput {
                name: name.to_string(),
                price,
                market_value,
            })
            .await?;
    }
    Ok(())
}

pub async fn main_router(ctx_state: &Arc<CtxState>, config: &AppConfig) -> Router {
    Router::new()
        .route("/hc", get(get_hc))
        .merge(pages::routes())
        .merge(auth_routes::routes())
        .merge(dashboard::routes())
        .merge(tasks::routes())
        .merge(profile::routes())
        .merge(currencies::routes())
        .merge(notifications::routes())
        .merge(admin::routes())
        .layer(from_fn_with_state(ctx_state.clone(), route_guard))
        .with_state(ctx_state.clone())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.allowed_origins))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_DNS_PREFETCH_CONTROL,
                    HeaderValue::from_static("on"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::STRICT_TRANSPORT_SECURITY,
                    HeaderValue::from_static("max-age=63072000; includeSubDomains; preload"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_XSS_PROTECTION,
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(CookieManagerLayer::new()),
        )
}

/// Only the listed origins get cross-origin access; an empty list allows none.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("->> ignoring invalid origin {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn get_hc() -> Response {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    (StatusCode::OK, format!("v{}", VERSION)).into_response()
}

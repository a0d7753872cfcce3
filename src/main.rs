use std::net::{Ipv4Addr, SocketAddr};

use taskreward_server::{
    config::AppConfig,
    database::client::Database,
    init,
    middleware::{error::AppResult, mw_ctx},
    services::live_update::LiveUpdateClient,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("taskreward_server=info,tower_http=info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let config = AppConfig::from_env();
    init_tracing();

    let db = Database::new();
    init::seed_exchange_rates(&db).await?;

    let ctx_state = mw_ctx::create_ctx_state(db, &config);
    let _live_updates = LiveUpdateClient::spawn(ctx_state.clone());

    init::seed_users(&ctx_state, &config.seed_password).await?;
    if config.is_development {
        init::seed_tasks(&ctx_state).await?;
    }

    let routes_all = init::main_router(&ctx_state, &config).await;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    info!("->> LISTENING on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("bind listener");
    axum::serve(listener, routes_all.into_make_service())
        .await
        .expect("server error");

    Ok(())
}

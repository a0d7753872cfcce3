#[macro_export]
macro_rules! test_with_server {
    ($name:ident, |$server:ident, $ctx_state:ident, $config:ident| $body:block) => {
        #[tokio::test(flavor = "multi_thread")]
        #[serial_test::serial]
        async fn $name() {
            use axum_test::{TestServer, TestServerConfig};
            use taskreward_server::config::AppConfig;
            use taskreward_server::database::client::Database;
            use taskreward_server::middleware::mw_ctx::create_ctx_state;
            use taskreward_server::services::live_update::LiveUpdateClient;

            let $config = AppConfig {
                jwt_secret: "secret".to_string(),
                jwt_duration_days: 1,
                allowed_origins: vec![],
                live_update_url: "/api/notifications/sse".to_string(),
                public_url: "http://localhost:8080".to_string(),
                port: 0,
                rates_api_url: None,
                referral_reward: 5.0,
                matching_game_reward: 5.0,
                match_delay_ms: 0,
                payout_delay_ms: 0,
                payout_failure_rate: 0.0,
                seed_password: "admin123".to_string(),
                is_development: true,
            };

            let $ctx_state = {
                let db = Database::new();
                taskreward_server::init::seed_exchange_rates(&db)
                    .await
                    .expect("seed exchange rates");
                create_ctx_state(db, &$config)
            };
            let live_updates = LiveUpdateClient::spawn($ctx_state.clone());
            taskreward_server::init::seed_users(&$ctx_state, &$config.seed_password)
                .await
                .expect("seed users");
            taskreward_server::init::seed_tasks(&$ctx_state)
                .await
                .expect("seed tasks");

            let routes_all = taskreward_server::init::main_router(&$ctx_state, &$config).await;

            let $server = TestServer::new_with_config(
                routes_all,
                TestServerConfig {
                    transport: None,
                    save_cookies: false,
                    expect_success_by_default: false,
                    restrict_requests_with_http_schema: false,
                    default_content_type: None,
                    default_scheme: None,
                },
            )
            .expect("Failed to create test server");

            $body

            live_updates.abort();
        }
    };
}

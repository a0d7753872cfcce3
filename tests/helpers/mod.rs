#![allow(dead_code)]

pub mod test_with_server;

use std::time::Duration;

use axum_test::TestServer;
use fake::{faker, Fake};
use serde_json::json;
use taskreward_server::{
    entities::{notification::Notification, user::User},
    init::{ADMIN_EMAIL, USER_EMAIL},
    interfaces::repositories::notification::NotificationRepositoryInterface,
    middleware::mw_ctx::CtxState,
    routes::auth_routes::AuthResponse,
};

pub const SEED_PASSWORD: &str = "admin123";

pub fn cookie(token: &str) -> String {
    format!("jwt={}", token)
}

pub async fn login(server: &TestServer, email: &str, password: &str) -> AuthResponse {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .add_header("Accept", "application/json")
        .await;
    response.assert_status_success();
    response.json::<AuthResponse>()
}

pub async fn admin_token(server: &TestServer) -> String {
    login(server, ADMIN_EMAIL, SEED_PASSWORD).await.token
}

pub async fn demo_user_token(server: &TestServer) -> String {
    login(server, USER_EMAIL, SEED_PASSWORD).await.token
}

pub async fn register_user(
    server: &TestServer,
    referral_code: Option<&str>,
) -> (User, String, String) {
    let password: String = faker::internet::en::Password(8..12).fake();
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": faker::name::en::Name().fake::<String>(),
            "email": faker::internet::en::FreeEmail().fake::<String>(),
            "password": password,
            "referral_code": referral_code,
        }))
        .add_header("Accept", "application/json")
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let auth = response.json::<AuthResponse>();
    (auth.user, password, auth.token)
}

/// Credits the user through the admin payments endpoint.
pub async fn credit_user(server: &TestServer, admin_token: &str, user_id: &str, amount: f64) {
    let response = server
        .post(&format!("/admin/users/{}/payments", user_id))
        .json(&json!({ "amount": amount }))
        .add_header("Cookie", cookie(admin_token))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
}

/// Live updates are stored by a background task; waits until `count` notifications exist.
pub async fn wait_for_notifications(
    ctx_state: &CtxState,
    user_id: &str,
    count: usize,
) -> Vec<Notification> {
    for _ in 0..50 {
        let notifications = ctx_state
            .db
            .notifications
            .get_by_user(user_id, None)
            .await
            .expect("list notifications");
        if notifications.len() >= count {
            return notifications;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("expected {count} notifications for {user_id}");
}

mod helpers;

use axum::http::StatusCode;
use helpers::{admin_token, cookie, demo_user_token, register_user};
use serde_json::{json, Value};
use taskreward_server::{
    entities::{
        payment::Payment,
        user::{User, UserStatus},
    },
    init::ADMIN_EMAIL,
    routes::profile::RewardsView,
};

test_with_server!(referrals_credit_the_referrer, |server, ctx_state, config| {
    let (referrer, _, token) = register_user(&server, None).await;

    register_user(&server, Some(referrer.referral_code.as_str())).await;
    let (referred, _, _) = register_user(&server, Some(referrer.referral_code.as_str())).await;
    assert_eq!(referred.referred_by.as_deref(), Some(referrer.id.as_str()));

    let response = server.get("/rewards").add_header("Cookie", cookie(&token)).await;
    response.assert_status_success();
    let rewards = response.json::<RewardsView>();
    assert_eq!(rewards.referral_count, 2);
    assert_eq!(rewards.referral_rewards, 10.0);
    assert_eq!(rewards.balance, 10.0);
    assert_eq!(
        rewards.referral_link,
        format!(
            "http://localhost:8080/auth/register?ref={}",
            referrer.referral_code
        )
    );

    let response = server.get("/dashboard").add_header("Cookie", cookie(&token)).await;
    assert_eq!(response.json::<Value>()["stats"]["commissions"], 10.0);
});

test_with_server!(profile_storage_snapshot, |server, ctx_state, config| {
    let token = demo_user_token(&server).await;

    let response = server
        .get("/profile/storage")
        .add_header("Cookie", cookie(&token))
        .await;
    response.assert_status_success();
    let snapshot = response.json::<Value>();
    assert_eq!(snapshot["name"], "user-storage");
    assert_eq!(snapshot["state"]["currentUser"]["email"], "user@example.com");
});

test_with_server!(admin_searches_and_bans_users, |server, ctx_state, config| {
    let admin = admin_token(&server).await;
    let (user, _, token) = register_user(&server, None).await;

    let response = server
        .get(&format!("/admin/users?search={}", user.email.to_uppercase()))
        .add_header("Cookie", cookie(&admin))
        .await;
    response.assert_status_success();
    let found = response.json::<Vec<User>>();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, user.id);

    let response = server
        .post(&format!("/admin/users/{}/status", user.id))
        .add_header("Cookie", cookie(&admin))
        .await;
    assert_eq!(response.json::<User>().status, UserStatus::Banned);

    let tasks = server.get("/tasks").add_header("Cookie", cookie(&token)).await;
    let task_id = tasks.json::<Value>()[0]["id"].as_str().unwrap().to_string();
    let response = server
        .post(&format!("/tasks/{}/complete", task_id))
        .add_header("Cookie", cookie(&token))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .get("/api/notifications")
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(
        response.json::<Value>()[0]["message"],
        "Your account has been banned"
    );

    let response = server
        .post(&format!("/admin/users/{}/status", user.id))
        .add_header("Cookie", cookie(&admin))
        .await;
    assert_eq!(response.json::<User>().status, UserStatus::Active);
});

test_with_server!(admins_can_not_be_banned, |server, ctx_state, config| {
    let admin = admin_token(&server).await;
    let response = server
        .get(&format!("/admin/users?search={}", ADMIN_EMAIL))
        .add_header("Cookie", cookie(&admin))
        .await;
    let admin_id = response.json::<Vec<User>>()[0].id.clone();

    let response = server
        .post(&format!("/admin/users/{}/status", admin_id))
        .add_header("Cookie", cookie(&admin))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
});

test_with_server!(admin_records_payments, |server, ctx_state, config| {
    let admin = admin_token(&server).await;
    let (user, _, token) = register_user(&server, None).await;

    let response = server
        .post(&format!("/admin/users/{}/payments", user.id))
        .json(&json!({ "amount": 25.0, "method": "USDT", "notes": "bonus" }))
        .add_header("Cookie", cookie(&admin))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server
        .post(&format!("/admin/users/{}/payments", user.id))
        .json(&json!({ "amount": 0.0 }))
        .add_header("Cookie", cookie(&admin))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get(&format!("/admin/users/{}/payments", user.id))
        .add_header("Cookie", cookie(&admin))
        .await;
    let payments = response.json::<Vec<Payment>>();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, 25.0);
    assert_eq!(payments[0].notes.as_deref(), Some("bonus"));

    let response = server.get("/profile").add_header("Cookie", cookie(&token)).await;
    let profile = response.json::<User>();
    assert_eq!(profile.balance, 25.0);
    assert_eq!(profile.total_earnings, 25.0);
});

mod helpers;

use axum::http::StatusCode;
use helpers::{admin_token, cookie, register_user, wait_for_notifications};
use serde_json::{json, Value};
use taskreward_server::{
    entities::notification::{Notification, NotificationType},
    interfaces::repositories::notification::NotificationRepositoryInterface,
};

test_with_server!(broadcast_reaches_listed_users, |server, ctx_state, config| {
    let admin = admin_token(&server).await;
    let (user0, _, token0) = register_user(&server, None).await;
    let (user1, _, _) = register_user(&server, None).await;

    let response = server
        .post("/admin/broadcast")
        .json(&json!({ "message": "Maintenance at noon", "user_ids": [user0.id] }))
        .add_header("Cookie", cookie(&admin))
        .await;
    response.assert_status_success();
    assert_eq!(response.json::<Value>()["receivers"], 1);

    let notifications = wait_for_notifications(&ctx_state, &user0.id, 1).await;
    assert_eq!(notifications[0].title, "Admin Update");
    assert_eq!(notifications[0].message, "Maintenance at noon");
    assert_eq!(notifications[0].r#type, NotificationType::Info);

    let response = server
        .get("/api/notifications/count")
        .add_header("Cookie", cookie(&token0))
        .await;
    assert_eq!(response.json::<u64>(), 1);

    let other = server.get("/api/notifications").await;
    other.assert_status(StatusCode::UNAUTHORIZED);
    let untouched = ctx_state
        .db
        .notifications
        .get_by_user(&user1.id, None)
        .await
        .unwrap();
    assert!(untouched.is_empty());
});

test_with_server!(broadcast_without_ids_reaches_all_users, |server, ctx_state, config| {
    let admin = admin_token(&server).await;
    let (user, _, _) = register_user(&server, None).await;

    let response = server
        .post("/admin/broadcast")
        .json(&json!({ "message": "Welcome" }))
        .add_header("Cookie", cookie(&admin))
        .await;
    response.assert_status_success();
    // the seeded demo user and the registered one
    assert_eq!(response.json::<Value>()["receivers"], 2);
    wait_for_notifications(&ctx_state, &user.id, 1).await;

    let response = server
        .post("/admin/broadcast")
        .json(&json!({ "message": "   " }))
        .add_header("Cookie", cookie(&admin))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
});

test_with_server!(notifications_are_marked_read, |server, ctx_state, config| {
    let admin = admin_token(&server).await;
    let (user, _, token) = register_user(&server, None).await;
    let (_, _, other_token) = register_user(&server, None).await;

    for message in ["first", "second", "third"] {
        server
            .post("/admin/broadcast")
            .json(&json!({ "message": message, "user_ids": [user.id] }))
            .add_header("Cookie", cookie(&admin))
            .await
            .assert_status_success();
    }
    let notifications = wait_for_notifications(&ctx_state, &user.id, 3).await;
    assert_eq!(notifications[0].message, "third");

    let response = server
        .post(&format!("/api/notifications/{}/read", notifications[0].id))
        .add_header("Cookie", cookie(&other_token))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    server
        .post(&format!("/api/notifications/{}/read", notifications[0].id))
        .add_header("Cookie", cookie(&token))
        .await
        .assert_status_success();

    let response = server
        .get("/api/notifications?is_read=false")
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(response.json::<Vec<Notification>>().len(), 2);

    let response = server
        .post("/api/notifications/read")
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(response.json::<Value>()["updated"], 2);

    let response = server
        .get("/api/notifications/count")
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(response.json::<u64>(), 0);
});

test_with_server!(large_broadcast_does_not_swallow_task_events, |server, ctx_state, config| {
    let admin = admin_token(&server).await;
    let (user, _, token) = register_user(&server, None).await;

    let user_ids: Vec<String> = (0..150).map(|i| format!("reader-{i}")).collect();
    server
        .post("/admin/broadcast")
        .json(&json!({ "message": "Quarterly bonus", "user_ids": user_ids }))
        .add_header("Cookie", cookie(&admin))
        .await
        .assert_status_success();

    let tasks = server
        .get("/tasks")
        .add_header("Cookie", cookie(&token))
        .await
        .json::<Vec<Value>>();
    let task_id = tasks[0]["id"].as_str().unwrap().to_string();
    server
        .post(&format!("/tasks/{task_id}/complete"))
        .add_header("Cookie", cookie(&token))
        .await
        .assert_status_success();

    let notifications = wait_for_notifications(&ctx_state, &user.id, 2).await;
    let titles: Vec<&str> = notifications.iter().map(|n| n.title.as_str()).collect();
    assert!(titles.contains(&"Task Completed"));
    assert!(titles.contains(&"Reward Earned"));
    wait_for_notifications(&ctx_state, "reader-149", 1).await;
});

mod helpers;

use axum::http::StatusCode;
use helpers::{admin_token, cookie, register_user, wait_for_notifications};
use serde_json::{json, Value};
use taskreward_server::{
    entities::{
        dashboard::PlatformStats,
        task::{Task, TaskStatus},
    },
    routes::dashboard::DashboardView,
    services::task_service::TaskCompletion,
};

test_with_server!(completing_a_task_pays_its_price, |server, ctx_state, config| {
    let (user, _, token) = register_user(&server, None).await;

    let response = server.get("/tasks").add_header("Cookie", cookie(&token)).await;
    response.assert_status_success();
    let tasks = response.json::<Vec<Task>>();
    assert_eq!(tasks.len(), 2);
    let task = tasks
        .iter()
        .find(|t| t.name == "Samsonite Backpack Product Test")
        .unwrap();

    let response = server
        .post(&format!("/tasks/{}/complete", task.id))
        .add_header("Cookie", cookie(&token))
        .await;
    response.assert_status_success();
    let completion = response.json::<TaskCompletion>();
    assert_eq!(completion.reward, 200.0);
    assert_eq!(completion.balance, 200.0);
    assert_eq!(completion.tasks_completed, 1);
    assert_eq!(completion.task.completions, 1);
    assert_eq!(completion.task.total_paid, 200.0);

    let response = server.get("/dashboard").add_header("Cookie", cookie(&token)).await;
    response.assert_status_success();
    let dashboard = response.json::<DashboardView>();
    assert_eq!(dashboard.balance, 200.0);
    assert_eq!(dashboard.stats.completed_tasks, 1);
    assert_eq!(dashboard.stats.total_tasks, 2);
    assert_eq!(dashboard.stats.total_earnings, 200.0);
    assert_eq!(dashboard.stats.daily_earnings, 200.0);
    assert_eq!(dashboard.payment_methods.len(), 2);

    let notifications = wait_for_notifications(&ctx_state, &user.id, 2).await;
    let titles: Vec<&str> = notifications.iter().map(|n| n.title.as_str()).collect();
    assert!(titles.contains(&"Task Completed"));
    assert!(titles.contains(&"Reward Earned"));
    assert!(notifications.iter().any(|n| n.message
        == "You earned 200 points for completing Samsonite Backpack Product Test!"));
});

test_with_server!(inactive_tasks_can_not_be_completed, |server, ctx_state, config| {
    let admin = admin_token(&server).await;
    let (_, _, token) = register_user(&server, None).await;

    let response = server
        .post("/admin/tasks")
        .json(&json!({ "name": "Nike Air Review", "price": 50.0, "market_value": 80.0 }))
        .add_header("Cookie", cookie(&admin))
        .await;
    response.assert_status(StatusCode::CREATED);
    let task = response.json::<Task>();
    assert_eq!(task.status, TaskStatus::Active);

    let response = server
        .post(&format!("/admin/tasks/{}/status", task.id))
        .add_header("Cookie", cookie(&admin))
        .await;
    response.assert_status_success();
    assert_eq!(response.json::<Task>().status, TaskStatus::Inactive);

    let response = server.get("/tasks").add_header("Cookie", cookie(&token)).await;
    assert!(response.json::<Vec<Task>>().iter().all(|t| t.id != task.id));

    let response = server
        .post(&format!("/tasks/{}/complete", task.id))
        .add_header("Cookie", cookie(&token))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Task is not active");

    let response = server
        .get("/admin/tasks?search=nike")
        .add_header("Cookie", cookie(&admin))
        .await;
    let found = response.json::<Vec<Task>>();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, task.id);
});

test_with_server!(admin_task_input_is_validated, |server, ctx_state, config| {
    let admin = admin_token(&server).await;
    let response = server
        .post("/admin/tasks")
        .json(&json!({ "name": "Free", "price": 0.0, "market_value": 10.0 }))
        .add_header("Cookie", cookie(&admin))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
});

test_with_server!(matching_game_pays_fixed_reward, |server, ctx_state, config| {
    let (user, _, token) = register_user(&server, None).await;

    let response = server
        .post("/tasks/matching-game")
        .add_header("Cookie", cookie(&token))
        .await;
    response.assert_status_success();
    let completion = response.json::<TaskCompletion>();
    assert_eq!(completion.reward, 5.0);
    assert_eq!(completion.balance, 5.0);

    let notifications = wait_for_notifications(&ctx_state, &user.id, 2).await;
    assert!(notifications
        .iter()
        .any(|n| n.message.starts_with("You earned 5 points for completing")));
});

test_with_server!(admin_overview_counts_regular_users, |server, ctx_state, config| {
    let admin = admin_token(&server).await;
    let (_, _, token) = register_user(&server, None).await;

    let response = server
        .post("/tasks/matching-game")
        .add_header("Cookie", cookie(&token))
        .await;
    response.assert_status_success();

    let response = server.get("/admin").add_header("Cookie", cookie(&admin)).await;
    response.assert_status_success();
    let stats = response.json::<PlatformStats>();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.active_users, 2);
    assert_eq!(stats.tasks_completed, 1);
    assert_eq!(stats.total_earnings, 5.0);
    // 1 completion over 2 users x 2 tasks
    assert_eq!(stats.completion_rate, 25.0);
    assert_eq!(stats.pending_withdrawals, 0);
});

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::{
    database::repositories::{
        dashboard::DashboardRepository, tasks::TaskRepository, users::UserRepository,
    },
    entities::task::Task,
    middleware::{
        auth_with_login_access::AuthWithLoginAccess,
        error::{CtxError, CtxResult},
        mw_ctx::CtxState,
    },
    services::task_service::{TaskCompletion, TaskService},
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/tasks", get(get_tasks))
        .route("/tasks/matching-game", post(play_matching_game))
        .route("/tasks/:task_id/complete", post(complete_task))
}

pub(crate) fn task_service(
    state: &CtxState,
) -> TaskService<'_, TaskRepository, UserRepository, DashboardRepository> {
    TaskService::new(
        &state.db.tasks,
        &state.db.users,
        &state.db.dashboard,
        &state.push_sender,
    )
}

async fn get_tasks(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<Vec<Task>>> {
    let tasks = task_service(&state)
        .list_active()
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(tasks))
}

async fn complete_task(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Path(task_id): Path<String>,
) -> CtxResult<Json<TaskCompletion>> {
    let completion = task_service(&state)
        .complete_task(&auth_data.user_id, &task_id, None)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(completion))
}

async fn play_matching_game(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<TaskCompletion>> {
    let completion = task_service(&state)
        .play_matching_game(
            &auth_data.user_id,
            state.match_delay,
            state.matching_game_reward,
        )
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(completion))
}

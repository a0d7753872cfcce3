use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive};
use axum::response::Sse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::warn;

use crate::database::repositories::notifications::NotificationRepository;
use crate::entities::notification::Notification;
use crate::middleware::auth_with_login_access::AuthWithLoginAccess;
use crate::middleware::error::{CtxError, CtxResult};
use crate::middleware::mw_ctx::{AppEventType, CtxState};
use crate::services::live_update::PushEvent;
use crate::services::notification_service::NotificationService;

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/notifications", get(get_notifications))
        .route("/api/notifications/read", post(read_all))
        .route("/api/notifications/sse", get(sse))
        .route("/api/notifications/count", get(get_count))
        .route("/api/notifications/:notification_id/read", post(read))
}

fn notification_service(state: &CtxState) -> NotificationService<'_, NotificationRepository> {
    NotificationService::new(&state.db.notifications, &state.event_sender)
}

async fn read(
    Path(notification_id): Path<String>,
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<()> {
    notification_service(&state)
        .mark_read(&auth_data.user_id, &notification_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadAllView {
    pub updated: u64,
}

async fn read_all(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<ReadAllView>> {
    let updated = notification_service(&state)
        .mark_all_read(&auth_data.user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(ReadAllView { updated }))
}

#[derive(Debug, Deserialize)]
struct GetNotificationsQuery {
    is_read: Option<bool>,
}

async fn get_notifications(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
    Query(query): Query<GetNotificationsQuery>,
) -> CtxResult<Json<Vec<Notification>>> {
    let notifications = notification_service(&state)
        .list(&auth_data.user_id, query.is_read)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(notifications))
}

async fn get_count(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Json<u64>> {
    let count = notification_service(&state)
        .unread_count(&auth_data.user_id)
        .await
        .map_err(CtxError::from(&auth_data.ctx))?;
    Ok(Json(count))
}

/// Streams the caller's notifications as they are stored.
async fn sse(
    State(state): State<Arc<CtxState>>,
    auth_data: AuthWithLoginAccess,
) -> CtxResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let user_id = auth_data.user_id;
    let rx = state.event_sender.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!("->> sse stream for {user_id} skipped {skipped} events");
            let notice = PushEvent::ConnectionError.notice();
            Some(Ok(Event::default().event("connectionError").data(
                json!({
                    "title": notice.title,
                    "message": notice.message,
                    "type": notice.r#type,
                })
                .to_string(),
            )))
        }
        Ok(msg) => match msg.event {
            AppEventType::UserNotificationEvent(n) if msg.receivers.contains(&user_id) => Some(
                Ok(Event::default().event("notification").data(json!(n).to_string())),
            ),
            _ => None,
        },
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::entities::notification::NotificationType;
use crate::middleware::mw_ctx::CtxState;
use crate::services::notification_service::{format_amount, NotificationService};

/// Server-pushed events, named like their wire events (`taskCompleted`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PushEvent {
    TaskCompleted {
        #[serde(rename = "taskName")]
        task_name: String,
    },
    RewardEarned {
        amount: f64,
        #[serde(rename = "taskName")]
        task_name: String,
    },
    AdminUpdate {
        message: String,
    },
    ConnectionError,
}

/// Title, message and type of the notification a push event turns into.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub r#type: NotificationType,
}

impl PushEvent {
    pub fn notice(&self) -> Notice {
        match self {
            PushEvent::TaskCompleted { task_name } => Notice {
                title: "Task Completed".to_string(),
                message: format!("Task \"{task_name}\" has been completed successfully!"),
                r#type: NotificationType::Success,
            },
            PushEvent::RewardEarned { amount, task_name } => Notice {
                title: "Reward Earned".to_string(),
                message: format!(
                    "You earned {} points for completing {task_name}!",
                    format_amount(*amount)
                ),
                r#type: NotificationType::Success,
            },
            PushEvent::AdminUpdate { message } => Notice {
                title: "Admin Update".to_string(),
                message: message.clone(),
                r#type: NotificationType::Info,
            },
            PushEvent::ConnectionError => Notice {
                title: "Connection Error".to_string(),
                message: "Failed to connect to notification service".to_string(),
                r#type: NotificationType::Error,
            },
        }
    }
}

/// Push events travel on their own unbounded queue, apart from the notification bus,
/// so notification fan-out can never crowd them out.
#[derive(Debug, Clone)]
pub struct PushMessage {
    pub from_user_id: String,
    pub receivers: Vec<String>,
    pub event: PushEvent,
}

pub type PushSender = UnboundedSender<PushMessage>;
pub type PushReceiver = UnboundedReceiver<PushMessage>;

pub fn publish(sender: &PushSender, from_user_id: &str, receivers: Vec<String>, event: PushEvent) {
    if receivers.is_empty() {
        return;
    }
    if sender
        .send(PushMessage {
            from_user_id: from_user_id.to_string(),
            receivers,
            event,
        })
        .is_err()
    {
        error!("->> live-update client is not running, push from {from_user_id} dropped");
    }
}

/// Drains the push queue and stores one notification per push event and receiver,
/// in publish order.
pub struct LiveUpdateClient;

impl LiveUpdateClient {
    pub fn spawn(state: Arc<CtxState>) -> JoinHandle<()> {
        let rx = state
            .push_receiver
            .lock()
            .ok()
            .and_then(|mut receiver| receiver.take());
        tokio::spawn(async move {
            let Some(mut rx) = rx else {
                error!("->> live-update client already running");
                return;
            };
            info!("->> live-update client listening");
            while let Some(PushMessage { event, receivers, .. }) = rx.recv().await {
                let notice = event.notice();
                let service =
                    NotificationService::new(&state.db.notifications, &state.event_sender);
                for receiver in receivers {
                    if let Err(err) = service
                        .create(&receiver, &notice.title, &notice.message, notice.r#type)
                        .await
                    {
                        error!("->> live-update notification for {receiver} failed: {err}");
                    }
                }
            }
        })
    }
}

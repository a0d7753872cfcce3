use chrono::Utc;
use tokio::sync::broadcast::Sender;
use tracing::debug;

use crate::entities::notification::{Notification, NotificationType};
use crate::entities::user::UserStatus;
use crate::entities::withdrawal::WithdrawalRequest;
use crate::interfaces::repositories::notification::NotificationRepositoryInterface;
use crate::middleware::error::AppResult;
use crate::middleware::mw_ctx::{AppEvent, AppEventType};
use crate::utils::generate::generate_id;

pub struct NotificationService<'a, N>
where
    N: NotificationRepositoryInterface,
{
    notification_repository: &'a N,
    event_sender: &'a Sender<AppEvent>,
}

impl<'a, N> NotificationService<'a, N>
where
    N: NotificationRepositoryInterface,
{
    pub fn new(notification_repository: &'a N, event_sender: &'a Sender<AppEvent>) -> Self {
        NotificationService {
            notification_repository,
            event_sender,
        }
    }

    pub async fn create(
        &self,
        user_id: &str,
        title: &str,
        message: &str,
        r#type: NotificationType,
    ) -> AppResult<Notification> {
        let notification = self
            .notification_repository
            .create(Notification {
                id: generate_id(),
                user_id: user_id.to_string(),
                title: title.to_string(),
                message: message.to_string(),
                r#type,
                read: false,
                created_at: Utc::now(),
            })
            .await?;

        // no subscribers is fine, the record is already stored
        let _ = self.event_sender.send(AppEvent {
            user_id: user_id.to_string(),
            event: AppEventType::UserNotificationEvent(notification.clone()),
            receivers: vec![user_id.to_string()],
        });
        debug!("->> notification {} for {user_id}: {title}", notification.id);
        Ok(notification)
    }

    pub async fn list(&self, user_id: &str, is_read: Option<bool>) -> AppResult<Vec<Notification>> {
        self.notification_repository
            .get_by_user(user_id, is_read)
            .await
    }

    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        self.notification_repository
            .read(notification_id, user_id)
            .await
    }

    pub async fn mark_all_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repository.read_all(user_id).await
    }

    pub async fn unread_count(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repository
            .get_count(user_id, Some(false))
            .await
    }

    pub async fn on_withdrawal_submitted(&self, request: &WithdrawalRequest) -> AppResult<()> {
        self.create(
            &request.user_id,
            "Withdrawal Requested",
            "Withdrawal request submitted successfully",
            NotificationType::Success,
        )
        .await?;
        Ok(())
    }

    pub async fn on_withdrawal_approved(
        &self,
        request: &WithdrawalRequest,
        amount: f64,
        currency: &str,
    ) -> AppResult<()> {
        let message = format!(
            "Your withdrawal of {} {currency} via {} has been processed successfully.",
            format_amount(amount),
            request.destination.method_name()
        );
        self.create(
            &request.user_id,
            "Withdrawal Approved",
            &message,
            NotificationType::Success,
        )
        .await?;
        Ok(())
    }

    pub async fn on_withdrawal_rejected(&self, request: &WithdrawalRequest) -> AppResult<()> {
        let message = match request.note.as_deref().map(str::trim) {
            Some(note) if !note.is_empty() => {
                format!("Your withdrawal request has been rejected. Reason: {note}")
            }
            _ => "Your withdrawal request has been rejected.".to_string(),
        };
        self.create(
            &request.user_id,
            "Withdrawal Rejected",
            &message,
            NotificationType::Error,
        )
        .await?;
        Ok(())
    }

    pub async fn on_user_status_changed(&self, user_id: &str, status: UserStatus) -> AppResult<()> {
        let (message, r#type) = match status {
            UserStatus::Banned => ("Your account has been banned", NotificationType::Warning),
            _ => ("Your account has been reactivated", NotificationType::Info),
        };
        self.create(user_id, "Account Status", message, r#type)
            .await?;
        Ok(())
    }
}

/// Amounts shown to users keep at most two decimals.
pub fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::notifications::NotificationRepository;
    use tokio::sync::broadcast;

    #[tokio::test]
    async fn unread_count_matches_unread_records() {
        let repo = NotificationRepository::new();
        let (sender, _) = broadcast::channel(16);
        let service = NotificationService::new(&repo, &sender);

        let mut ids = vec![];
        for i in 0..4 {
            let n = service
                .create("u1", "title", &format!("m{i}"), NotificationType::Info)
                .await
                .unwrap();
            ids.push(n.id);
        }
        service
            .create("u2", "other", "m", NotificationType::Info)
            .await
            .unwrap();

        service.mark_read("u1", &ids[1]).await.unwrap();
        let unread = service.list("u1", Some(false)).await.unwrap();
        assert_eq!(service.unread_count("u1").await.unwrap(), unread.len() as u64);
        assert_eq!(unread.len(), 3);

        assert_eq!(service.mark_all_read("u1").await.unwrap(), 3);
        assert_eq!(service.unread_count("u1").await.unwrap(), 0);
        assert_eq!(service.unread_count("u2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn cannot_mark_someone_elses_notification() {
        let repo = NotificationRepository::new();
        let (sender, _) = broadcast::channel(16);
        let service = NotificationService::new(&repo, &sender);
        let n = service
            .create("u1", "t", "m", NotificationType::Info)
            .await
            .unwrap();
        assert!(service.mark_read("u2", &n.id).await.is_err());
    }

    #[tokio::test]
    async fn creating_publishes_to_owner() {
        let repo = NotificationRepository::new();
        let (sender, mut rx) = broadcast::channel(16);
        let service = NotificationService::new(&repo, &sender);
        service
            .create("u1", "t", "m", NotificationType::Success)
            .await
            .unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.receivers, vec!["u1".to_string()]);
        assert!(matches!(event.event, AppEventType::UserNotificationEvent(_)));
    }

    #[test]
    fn amounts_are_trimmed() {
        assert_eq!(format_amount(515.0), "515");
        assert_eq!(format_amount(5.25), "5.25");
    }
}

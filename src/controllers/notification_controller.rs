use uuid::Uuid;

use crate::dto::notification_dto::{NotificationResponse, UnreadCountResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::notification_repository::NotificationRepository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub struct NotificationController {
    notifications: NotificationRepository,
}

impl NotificationController {
    pub fn new(state: &AppState) -> Self {
        Self {
            notifications: NotificationRepository::new(state.pool.clone()),
        }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<NotificationResponse>, AppError> {
        let notifications = self.notifications.list_by_user(actor.user_id).await?;
        Ok(notifications.into_iter().map(Into::into).collect())
    }

    pub async fn unread_count(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<UnreadCountResponse, AppError> {
        let unread_count = self.notifications.unread_count(actor.user_id).await?;
        Ok(UnreadCountResponse { unread_count })
    }

    /// El WHERE del repositorio restringe al destinatario: marcar una
    /// notificación ajena devuelve not found, no un leak de existencia
    pub async fn mark_read(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<NotificationResponse, AppError> {
        let notification = self
            .notifications
            .mark_read(id, actor.user_id)
            .await?
            .ok_or_else(|| not_found_error("Notification", &id.to_string()))?;

        Ok(notification.into())
    }
}

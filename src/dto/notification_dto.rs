use serde::Serialize;

use crate::models::notification::Notification;

/// Response de notificación para la API
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub related_id: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            title: notification.title,
            message: notification.message,
            notification_type: notification.notification_type,
            related_id: notification.related_id.map(|id| id.to_string()),
            is_read: notification.is_read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

/// Recuento de no leídas
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

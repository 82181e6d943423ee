//! Modelo de Notification
//!
//! Fila durable de notificación por destinatario. Solo se inserta y se marca
//! como leída; nunca se borra. El contador de no leídas se recalcula bajo
//! demanda, no hay contador cacheado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub related_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        title: String,
        message: String,
        notification_type: String,
        related_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            message,
            notification_type,
            related_id,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

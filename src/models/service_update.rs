//! Modelo de ServiceUpdate
//!
//! Nota de progreso adjunta a una solicitud. Append-only: se inserta y se
//! lista en orden descendente por fecha, nunca se edita ni se borra.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceUpdate {
    pub id: Uuid,
    pub service_request_id: Uuid,
    pub message: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

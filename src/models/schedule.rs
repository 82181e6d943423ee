//! Modelo de MechanicSchedule
//!
//! Bloque de calendario informativo creado en el momento de la asignación.
//! No es autoritativo para la disponibilidad del mecánico.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Duración fija del bloque creado por una asignación, en horas.
/// Heurística fija, no una estimación dinámica.
pub const ASSIGNMENT_BLOCK_HOURS: i64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MechanicSchedule {
    pub id: Uuid,
    pub mechanic_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub entry_type: String,
    pub service_request_id: Option<Uuid>,
}

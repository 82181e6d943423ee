//! Modelo de Mechanic
//!
//! Mapea exactamente a la tabla mechanics. La disponibilidad es mutuamente
//! excluyente con mantener una asignación activa: in_service exactamente
//! mientras el mecánico tiene una solicitud asignada no terminal.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Disponibilidad del mecánico - mapea al ENUM mechanic_availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "mechanic_availability", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    InService,
    NotAvailable,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::InService => "in_service",
            Availability::NotAvailable => "not_available",
        }
    }
}

/// Mechanic principal - mapea exactamente a la tabla mechanics
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Mechanic {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workshop_id: Uuid,
    pub full_name: String,
    pub availability: Availability,
    pub specialties: Vec<String>,
    pub rating: f64,
}

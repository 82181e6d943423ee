//! Modelo de Workshop
//!
//! Mapea exactamente a la tabla workshops. Un taller pertenece a un admin y
//! posee cero o más mecánicos; las solicitudes lo referencian sin poseerlo.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workshop {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_open: bool,
    pub rating: f64,
    pub review_count: i32,
}

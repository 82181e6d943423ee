use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::service_request::{RequestStatus, ServiceRequest, Urgency};
use crate::models::service_update::ServiceUpdate;

/// Request para crear una solicitud de servicio
#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequestRequest {
    pub workshop_id: Option<Uuid>,

    #[validate(length(min = 2, max = 100))]
    pub vehicle_make: String,

    #[validate(length(min = 1, max = 100))]
    pub vehicle_model: String,

    #[validate(length(min = 4, max = 20))]
    pub vehicle_plate: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub issue_type: String,

    #[validate(length(min = 5, max = 2000))]
    pub description: String,

    pub urgency: Urgency,

    #[validate(length(min = 5, max = 300))]
    pub pickup_address: String,

    pub latitude: f64,
    pub longitude: f64,

    #[serde(default)]
    pub images: Vec<String>,
}

/// Request para asignar un mecánico
#[derive(Debug, Deserialize)]
pub struct AssignMechanicRequest {
    pub mechanic_id: Uuid,
}

/// Request para una transición de estado
#[derive(Debug, Deserialize)]
pub struct TransitionStatusRequest {
    pub status: RequestStatus,
    pub note: Option<String>,
}

/// Request para actualizar costes
#[derive(Debug, Deserialize)]
pub struct UpdateCostRequest {
    pub estimated_cost: Option<Decimal>,
    pub final_cost: Option<Decimal>,
}

/// Request para añadir una nota de progreso
#[derive(Debug, Deserialize, Validate)]
pub struct AppendUpdateRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,

    #[serde(default)]
    pub images: Vec<String>,
}

/// Response de solicitud para la API
#[derive(Debug, Serialize)]
pub struct ServiceRequestResponse {
    pub id: String,
    pub customer_id: String,
    pub workshop_id: Option<String>,
    pub mechanic_id: Option<String>,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_plate: Option<String>,
    pub issue_type: String,
    pub description: String,
    pub urgency: Urgency,
    pub pickup_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub images: Vec<String>,
    pub status: RequestStatus,
    pub estimated_cost: Option<String>,
    pub final_cost: Option<String>,
    pub created_at: String,
    pub assigned_at: Option<String>,
    pub started_at: Option<String>,
    pub reached_at: Option<String>,
    pub completed_at: Option<String>,
}

impl From<ServiceRequest> for ServiceRequestResponse {
    fn from(request: ServiceRequest) -> Self {
        Self {
            id: request.id.to_string(),
            customer_id: request.customer_id.to_string(),
            workshop_id: request.workshop_id.map(|id| id.to_string()),
            mechanic_id: request.mechanic_id.map(|id| id.to_string()),
            vehicle_make: request.vehicle_make,
            vehicle_model: request.vehicle_model,
            vehicle_plate: request.vehicle_plate,
            issue_type: request.issue_type,
            description: request.description,
            urgency: request.urgency,
            pickup_address: request.pickup_address,
            latitude: request.latitude,
            longitude: request.longitude,
            images: request.images,
            status: request.status,
            estimated_cost: request.estimated_cost.map(|c| c.to_string()),
            final_cost: request.final_cost.map(|c| c.to_string()),
            created_at: request.created_at.to_rfc3339(),
            assigned_at: request.assigned_at.map(|t| t.to_rfc3339()),
            started_at: request.started_at.map(|t| t.to_rfc3339()),
            reached_at: request.reached_at.map(|t| t.to_rfc3339()),
            completed_at: request.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Response de nota de progreso
#[derive(Debug, Serialize)]
pub struct ServiceUpdateResponse {
    pub id: String,
    pub service_request_id: String,
    pub message: String,
    pub images: Vec<String>,
    pub created_at: String,
}

impl From<ServiceUpdate> for ServiceUpdateResponse {
    fn from(update: ServiceUpdate) -> Self {
        Self {
            id: update.id.to_string(),
            service_request_id: update.service_request_id.to_string(),
            message: update.message,
            images: update.images,
            created_at: update.created_at.to_rfc3339(),
        }
    }
}

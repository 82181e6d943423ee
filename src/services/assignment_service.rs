//! Coordinador de asignaciones
//!
//! Vincula mecánico y solicitud en una unidad atómica: los dos updates
//! condicionales (disponibilidad del mecánico y estado de la solicitud)
//! corren en la misma transacción, de modo que ningún observador ve solo
//! uno de los dos flips. El bloque de agenda y las notificaciones son
//! canales secundarios best-effort y no revierten la asignación ya
//! confirmada.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::mechanic::{Availability, Mechanic};
use crate::models::schedule::ASSIGNMENT_BLOCK_HOURS;
use crate::models::service_request::{RequestStatus, ServiceRequest};
use crate::realtime::RealtimePort;
use crate::repositories::mechanic_repository::MechanicRepository;
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::repositories::service_request_repository::ServiceRequestRepository;
use crate::services::notification_fanout::NotificationFanout;
use crate::utils::errors::{
    forbidden_error, not_found_error, state_conflict_error, AppError, AppResult,
};

/// Precondiciones de asignación sobre el estado leído. La misma condición
/// se reimpone después como WHERE de los updates, que es lo que decide una
/// carrera entre dos asignaciones concurrentes.
pub fn validate_assignment_preconditions(
    request_status: RequestStatus,
    availability: Availability,
) -> AppResult<()> {
    if request_status != RequestStatus::Submitted {
        return Err(state_conflict_error(
            "request is already assigned; cancel it before reassigning",
        ));
    }
    if availability != Availability::Available {
        return Err(state_conflict_error("mechanic is not available"));
    }
    Ok(())
}

pub struct AssignmentService {
    pool: PgPool,
    requests: ServiceRequestRepository,
    mechanics: MechanicRepository,
    schedules: ScheduleRepository,
    fanout: NotificationFanout,
}

impl AssignmentService {
    pub fn new(pool: PgPool, realtime: Arc<dyn RealtimePort>) -> Self {
        Self {
            requests: ServiceRequestRepository::new(pool.clone()),
            mechanics: MechanicRepository::new(pool.clone()),
            schedules: ScheduleRepository::new(pool.clone()),
            fanout: NotificationFanout::new(pool.clone(), realtime),
            pool,
        }
    }

    pub async fn assign(
        &self,
        request_id: Uuid,
        mechanic_id: Uuid,
        admin: &AuthenticatedUser,
    ) -> AppResult<ServiceRequest> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| not_found_error("Service request", &request_id.to_string()))?;

        let mechanic = self
            .mechanics
            .find_by_id(mechanic_id)
            .await?
            .ok_or_else(|| not_found_error("Mechanic", &mechanic_id.to_string()))?;

        if admin.workshop_id != Some(mechanic.workshop_id) {
            return Err(forbidden_error(
                "assign this mechanic",
                "mechanic does not belong to your workshop",
            ));
        }

        validate_assignment_preconditions(request.status, mechanic.availability)?;

        let assigned = self.commit_assignment(&request, &mechanic).await?;

        log::info!(
            "🔧 Solicitud {} asignada al mecánico {} por {}",
            assigned.id,
            mechanic.id,
            admin.user_id
        );

        // Canales secundarios: el estado autoritativo ya está confirmado
        self.create_schedule_block(&assigned, &mechanic).await;
        self.fanout.notify_assignment(&assigned, &mechanic).await;

        Ok(assigned)
    }

    /// Los dos flips en una transacción. Cada update re-verifica en su WHERE
    /// la precondición leída; cero filas significa que otra asignación ganó
    /// la carrera y nada se escribe.
    async fn commit_assignment(
        &self,
        request: &ServiceRequest,
        mechanic: &Mechanic,
    ) -> AppResult<ServiceRequest> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let flipped = sqlx::query_as::<_, Mechanic>(
            "UPDATE mechanics SET availability = $1 WHERE id = $2 AND availability = $3 RETURNING *",
        )
        .bind(Availability::InService)
        .bind(mechanic.id)
        .bind(Availability::Available)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if flipped.is_none() {
            return Err(state_conflict_error("mechanic is not available"));
        }

        let assigned = sqlx::query_as::<_, ServiceRequest>(
            r#"
            UPDATE service_requests
            SET mechanic_id = $1,
                workshop_id = COALESCE(workshop_id, $2),
                status = $3,
                assigned_at = COALESCE(assigned_at, $4)
            WHERE id = $5 AND status = $6
            RETURNING *
            "#,
        )
        .bind(mechanic.id)
        .bind(mechanic.workshop_id)
        .bind(RequestStatus::Assigned)
        .bind(Utc::now())
        .bind(request.id)
        .bind(RequestStatus::Submitted)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let assigned = assigned.ok_or_else(|| {
            state_conflict_error("request is already assigned; cancel it before reassigning")
        })?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(assigned)
    }

    /// Bloque de agenda de duración fija [now, now+2h]. Heurística fija,
    /// no una estimación dinámica.
    async fn create_schedule_block(&self, request: &ServiceRequest, mechanic: &Mechanic) {
        let start = Utc::now();
        let end = start + Duration::hours(ASSIGNMENT_BLOCK_HOURS);

        let result = self
            .schedules
            .create(
                mechanic.id,
                format!("Servicio: {} {}", request.vehicle_make, request.vehicle_model),
                Some(request.pickup_address.clone()),
                start,
                end,
                "service_assignment".to_string(),
                Some(request.id),
            )
            .await;

        if let Err(e) = result {
            log::warn!(
                "⚠️ Bloque de agenda no creado para la solicitud {}: {}",
                request.id,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preconditions_ok_when_submitted_and_available() {
        assert!(
            validate_assignment_preconditions(RequestStatus::Submitted, Availability::Available)
                .is_ok()
        );
    }

    #[test]
    fn test_busy_or_off_duty_mechanic_is_rejected() {
        for availability in [Availability::InService, Availability::NotAvailable] {
            let err =
                validate_assignment_preconditions(RequestStatus::Submitted, availability)
                    .unwrap_err();
            assert!(matches!(err, AppError::StateConflict(_)));
        }
    }

    #[test]
    fn test_non_submitted_request_is_rejected() {
        for status in [
            RequestStatus::Assigned,
            RequestStatus::InProgress,
            RequestStatus::Reached,
            RequestStatus::Completed,
            RequestStatus::Cancelled,
        ] {
            let err = validate_assignment_preconditions(status, Availability::Available)
                .unwrap_err();
            assert!(matches!(err, AppError::StateConflict(_)));
        }
    }
}

//! Ciclo de vida de las solicitudes de servicio
//!
//! Dueño de la máquina de estados y de sus timestamps. Toda mutación de
//! estado pasa por la tabla de transiciones de models::service_request y se
//! aplica como un update condicional dentro de una transacción: dos
//! transiciones concurrentes sobre la misma solicitud no pueden pisarse.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::service_request_dto::CreateServiceRequestRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::mechanic::Availability;
use crate::models::service_request::{
    check_transition, RequestStatus, ServiceRequest, TransitionCheck,
};
use crate::models::user::UserRole;
use crate::realtime::RealtimePort;
use crate::repositories::service_request_repository::ServiceRequestRepository;
use crate::repositories::service_update_repository::ServiceUpdateRepository;
use crate::repositories::workshop_repository::WorkshopRepository;
use crate::services::email_service::EmailService;
use crate::services::notification_fanout::NotificationFanout;
use crate::services::policy;
use crate::utils::errors::{
    forbidden_error, not_found_error, state_conflict_error, validation_error, AppError, AppResult,
};
use crate::utils::validation::validate_coordinates;

pub struct LifecycleService {
    pool: PgPool,
    requests: ServiceRequestRepository,
    workshops: WorkshopRepository,
    updates: ServiceUpdateRepository,
    fanout: NotificationFanout,
    email: EmailService,
}

impl LifecycleService {
    pub fn new(
        pool: PgPool,
        realtime: Arc<dyn RealtimePort>,
        config: &crate::config::environment::EnvironmentConfig,
    ) -> Self {
        Self {
            requests: ServiceRequestRepository::new(pool.clone()),
            workshops: WorkshopRepository::new(pool.clone()),
            updates: ServiceUpdateRepository::new(pool.clone()),
            fanout: NotificationFanout::new(pool.clone(), realtime),
            email: EmailService::new(config),
            pool,
        }
    }

    /// Crear una solicitud en estado submitted. Sin taller preseleccionado
    /// queda sin asignar para el descubrimiento por broadcast.
    pub async fn create(
        &self,
        customer_id: Uuid,
        payload: &CreateServiceRequestRequest,
    ) -> AppResult<ServiceRequest> {
        if validate_coordinates(payload.latitude, payload.longitude).is_err() {
            return Err(validation_error("coordinates", "coordinates out of range"));
        }

        if let Some(workshop_id) = payload.workshop_id {
            self.workshops
                .find_by_id(workshop_id)
                .await?
                .ok_or_else(|| not_found_error("Workshop", &workshop_id.to_string()))?;
        }

        let request = self.requests.create(customer_id, payload).await?;
        log::info!("🆘 Solicitud {} creada por {}", request.id, customer_id);

        match request.workshop_id {
            Some(workshop_id) => {
                match self.workshops.find_admin_contact(workshop_id).await {
                    Ok(Some((admin_user_id, admin_email))) => {
                        self.fanout.notify_new_request(&request, admin_user_id).await;
                        if let Err(e) = self.email.send_request_received(&admin_email, &request).await
                        {
                            log::warn!("⚠️ Email de nueva solicitud no enviado: {}", e);
                        }
                    }
                    Ok(None) => {
                        log::warn!("⚠️ Taller {} sin admin localizable", workshop_id);
                    }
                    Err(e) => {
                        log::warn!("⚠️ No se pudo resolver el admin del taller: {}", e);
                    }
                }
            }
            None => self.fanout.broadcast_new_request(&request).await,
        }

        Ok(request)
    }

    /// Transición de estado validada contra la tabla fija. Repetir una
    /// transición ya aplicada es idempotente: el timestamp no se mueve.
    pub async fn transition(
        &self,
        request_id: Uuid,
        target: RequestStatus,
        actor: &AuthenticatedUser,
        note: Option<String>,
    ) -> AppResult<ServiceRequest> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| not_found_error("Service request", &request_id.to_string()))?;

        self.check_transition_permission(&request, target, actor)?;

        match check_transition(request.status, target) {
            TransitionCheck::Noop => return Ok(request),
            TransitionCheck::Invalid => {
                return Err(state_conflict_error(&format!(
                    "invalid transition {} -> {}",
                    request.status.as_str(),
                    target.as_str()
                )));
            }
            TransitionCheck::Apply => {}
        }

        let updated = self.apply_transition(&request, target).await?;

        // Efectos secundarios best-effort tras el commit
        let admin_user_id = match updated.workshop_id {
            Some(workshop_id) => match self.workshops.find_admin_contact(workshop_id).await {
                Ok(contact) => contact.map(|(id, _)| id),
                Err(e) => {
                    log::warn!("⚠️ No se pudo resolver el admin del taller: {}", e);
                    None
                }
            },
            None => None,
        };
        self.fanout.notify_status_change(&updated, admin_user_id).await;

        if let Some(note) = note {
            if actor.role == UserRole::Mechanic {
                if let Err(e) = self.updates.create(updated.id, note, vec![]).await {
                    log::warn!("⚠️ Nota de transición no registrada: {}", e);
                }
            }
        }

        Ok(updated)
    }

    fn check_transition_permission(
        &self,
        request: &ServiceRequest,
        target: RequestStatus,
        actor: &AuthenticatedUser,
    ) -> AppResult<()> {
        match target {
            RequestStatus::Submitted | RequestStatus::Assigned => Err(forbidden_error(
                "set this status directly",
                "assignment goes through the assign operation",
            )),
            RequestStatus::InProgress | RequestStatus::Reached | RequestStatus::Completed => {
                if policy::can_progress_request(actor, request) {
                    Ok(())
                } else {
                    Err(forbidden_error(
                        "advance this request",
                        "only the assigned mechanic can report progress",
                    ))
                }
            }
            RequestStatus::Cancelled => {
                if policy::can_cancel_request(actor, request) {
                    Ok(())
                } else {
                    Err(forbidden_error(
                        "cancel this request",
                        "only the owning customer or the assigned mechanic can cancel",
                    ))
                }
            }
        }
    }

    /// Flip de estado + timestamp en una transacción. El WHERE sobre el
    /// estado actual actúa como check optimista: si otra transición ganó la
    /// carrera, no se escribe nada.
    async fn apply_transition(
        &self,
        request: &ServiceRequest,
        target: RequestStatus,
    ) -> AppResult<ServiceRequest> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let now = Utc::now();

        let updated = match target.timestamp_column() {
            Some(column) => {
                let sql = format!(
                    "UPDATE service_requests SET status = $1, {col} = COALESCE({col}, $2) \
                     WHERE id = $3 AND status = $4 RETURNING *",
                    col = column
                );
                sqlx::query_as::<_, ServiceRequest>(&sql)
                    .bind(target)
                    .bind(now)
                    .bind(request.id)
                    .bind(request.status)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::Database)?
            }
            None => sqlx::query_as::<_, ServiceRequest>(
                "UPDATE service_requests SET status = $1 WHERE id = $2 AND status = $3 RETURNING *",
            )
            .bind(target)
            .bind(request.id)
            .bind(request.status)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?,
        };

        let updated = updated
            .ok_or_else(|| state_conflict_error("request state changed concurrently"))?;

        // Completar o cancelar con mecánico asignado lo devuelve a available
        let releases_mechanic = target == RequestStatus::Completed
            || (target == RequestStatus::Cancelled && request.mechanic_id.is_some());
        if releases_mechanic {
            if let Some(mechanic_id) = request.mechanic_id {
                sqlx::query("UPDATE mechanics SET availability = $1 WHERE id = $2 AND availability = $3")
                    .bind(Availability::Available)
                    .bind(mechanic_id)
                    .bind(Availability::InService)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::Database)?;
            }
        }

        tx.commit().await.map_err(AppError::Database)?;

        log::info!(
            "🔁 Solicitud {} pasó de {} a {}",
            updated.id,
            request.status.as_str(),
            updated.status.as_str()
        );
        Ok(updated)
    }

    /// Costes del servicio, mutables solo por el mecánico asignado
    pub async fn update_cost(
        &self,
        request_id: Uuid,
        actor: &AuthenticatedUser,
        estimated_cost: Option<Decimal>,
        final_cost: Option<Decimal>,
    ) -> AppResult<ServiceRequest> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| not_found_error("Service request", &request_id.to_string()))?;

        if !policy::can_progress_request(actor, &request) {
            return Err(forbidden_error(
                "update costs",
                "only the assigned mechanic can set costs",
            ));
        }
        if request.status == RequestStatus::Cancelled {
            return Err(state_conflict_error("cannot set costs on a cancelled request"));
        }

        self.requests
            .update_costs(request_id, estimated_cost, final_cost)
            .await
    }
}

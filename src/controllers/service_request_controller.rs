use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::service_request_dto::{
    AppendUpdateRequest, AssignMechanicRequest, CreateServiceRequestRequest,
    ServiceRequestResponse, ServiceUpdateResponse, TransitionStatusRequest, UpdateCostRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserRole;
use crate::repositories::service_request_repository::ServiceRequestRepository;
use crate::services::assignment_service::AssignmentService;
use crate::services::lifecycle_service::LifecycleService;
use crate::services::policy;
use crate::services::service_update_service::ServiceUpdateService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, forbidden_error, not_found_error, AppError};
use uuid::Uuid;

pub struct ServiceRequestController {
    lifecycle: LifecycleService,
    assignment: AssignmentService,
    update_log: ServiceUpdateService,
    requests: ServiceRequestRepository,
}

impl ServiceRequestController {
    pub fn new(state: &AppState) -> Self {
        Self {
            lifecycle: LifecycleService::new(
                state.pool.clone(),
                state.realtime_port(),
                &state.config,
            ),
            assignment: AssignmentService::new(state.pool.clone(), state.realtime_port()),
            update_log: ServiceUpdateService::new(state.pool.clone(), state.realtime_port()),
            requests: ServiceRequestRepository::new(state.pool.clone()),
        }
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateServiceRequestRequest,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        if actor.role != UserRole::Customer {
            return Err(forbidden_error(
                "create a service request",
                "only customers submit requests",
            ));
        }
        request.validate()?;

        let created = self.lifecycle.create(actor.user_id, &request).await?;

        Ok(ApiResponse::success_with_message(
            created.into(),
            "Solicitud creada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<ServiceRequestResponse, AppError> {
        let request = self
            .requests
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Service request", &id.to_string()))?;

        if !policy::can_read_request(actor, &request) {
            return Err(forbidden_error("read this request", "no access"));
        }

        Ok(request.into())
    }

    /// Listado con el ámbito del actor: el cliente ve las suyas, el admin
    /// las de su taller más las sin asignar, el mecánico las asignadas a él
    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<ServiceRequestResponse>, AppError> {
        let requests = match actor.role {
            UserRole::Customer => self.requests.list_by_customer(actor.user_id).await?,
            UserRole::WorkshopAdmin => {
                let workshop_id = actor.workshop_id.ok_or_else(|| {
                    forbidden_error("list requests", "admin has no workshop")
                })?;
                self.requests.list_for_workshop_admin(workshop_id).await?
            }
            UserRole::Mechanic => {
                let mechanic_id = actor.mechanic_id.ok_or_else(|| {
                    forbidden_error("list requests", "no mechanic profile for this user")
                })?;
                self.requests.list_by_mechanic(mechanic_id).await?
            }
        };

        Ok(requests.into_iter().map(Into::into).collect())
    }

    pub async fn assign(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: AssignMechanicRequest,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        if actor.role != UserRole::WorkshopAdmin {
            return Err(forbidden_error(
                "assign a mechanic",
                "only workshop admins assign mechanics",
            ));
        }

        let assigned = self.assignment.assign(id, request.mechanic_id, actor).await?;

        Ok(ApiResponse::success_with_message(
            assigned.into(),
            "Mecánico asignado exitosamente".to_string(),
        ))
    }

    pub async fn transition(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: TransitionStatusRequest,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        let updated = self
            .lifecycle
            .transition(id, request.status, actor, request.note)
            .await?;

        Ok(ApiResponse::success(updated.into()))
    }

    pub async fn update_cost(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateCostRequest,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        if request.estimated_cost.is_none() && request.final_cost.is_none() {
            return Err(bad_request_error("no cost fields provided"));
        }

        let updated = self
            .lifecycle
            .update_cost(id, actor, request.estimated_cost, request.final_cost)
            .await?;

        Ok(ApiResponse::success(updated.into()))
    }

    pub async fn append_update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: AppendUpdateRequest,
    ) -> Result<ApiResponse<ServiceUpdateResponse>, AppError> {
        request.validate()?;

        let update = self.update_log.append(id, actor, request).await?;

        Ok(ApiResponse::success(update.into()))
    }

    pub async fn list_updates(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Vec<ServiceUpdateResponse>, AppError> {
        let updates = self.update_log.list(id, actor).await?;
        Ok(updates.into_iter().map(Into::into).collect())
    }
}

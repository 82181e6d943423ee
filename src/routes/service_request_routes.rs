use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::service_request_controller::ServiceRequestController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::service_request_dto::{
    AppendUpdateRequest, AssignMechanicRequest, CreateServiceRequestRequest,
    ServiceRequestResponse, ServiceUpdateResponse, TransitionStatusRequest, UpdateCostRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_service_request_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_request).get(list_requests))
        .route("/:id", get(get_request))
        .route("/:id/assign", post(assign_mechanic))
        .route("/:id/status", post(transition_status))
        .route("/:id/cost", post(update_cost))
        .route("/:id/update", post(append_update).get(list_updates))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn create_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateServiceRequestRequest>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let controller = ServiceRequestController::new(&state);
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn list_requests(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ServiceRequestResponse>>, AppError> {
    let controller = ServiceRequestController::new(&state);
    let response = controller.list(&user).await?;
    Ok(Json(response))
}

async fn get_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceRequestResponse>, AppError> {
    let controller = ServiceRequestController::new(&state);
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn assign_mechanic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignMechanicRequest>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let controller = ServiceRequestController::new(&state);
    let response = controller.assign(&user, id, request).await?;
    Ok(Json(response))
}

async fn transition_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransitionStatusRequest>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let controller = ServiceRequestController::new(&state);
    let response = controller.transition(&user, id, request).await?;
    Ok(Json(response))
}

async fn update_cost(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCostRequest>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let controller = ServiceRequestController::new(&state);
    let response = controller.update_cost(&user, id, request).await?;
    Ok(Json(response))
}

async fn append_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AppendUpdateRequest>,
) -> Result<Json<ApiResponse<ServiceUpdateResponse>>, AppError> {
    let controller = ServiceRequestController::new(&state);
    let response = controller.append_update(&user, id, request).await?;
    Ok(Json(response))
}

async fn list_updates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ServiceUpdateResponse>>, AppError> {
    let controller = ServiceRequestController::new(&state);
    let response = controller.list_updates(&user, id).await?;
    Ok(Json(response))
}

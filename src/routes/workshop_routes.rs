use axum::{
    extract::{Query, State},
    middleware::from_fn_with_state,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::workshop_controller::WorkshopController;
use crate::dto::workshop_dto::{MechanicSearchQuery, NearbyWorkshopsQuery};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::mechanic::Mechanic;
use crate::models::schedule::MechanicSchedule;
use crate::services::geo_ranking::{RankedPlace, RankedWorkshop};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_workshop_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/nearby", get(nearby_workshops))
        .route("/search-mechanics", get(search_mechanics))
        .route("/mechanics", get(list_my_mechanics))
        .route("/my-schedule", get(my_schedule))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn nearby_workshops(
    State(state): State<AppState>,
    Query(query): Query<NearbyWorkshopsQuery>,
) -> Result<Json<Vec<RankedWorkshop>>, AppError> {
    let controller = WorkshopController::new(&state);
    let response = controller.nearby(query).await?;
    Ok(Json(response))
}

async fn search_mechanics(
    State(state): State<AppState>,
    Query(query): Query<MechanicSearchQuery>,
) -> Result<Json<Vec<RankedPlace>>, AppError> {
    let controller = WorkshopController::new(&state);
    let response = controller.search_mechanics(query).await?;
    Ok(Json(response))
}

async fn list_my_mechanics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Mechanic>>, AppError> {
    let controller = WorkshopController::new(&state);
    let response = controller.list_my_mechanics(&user).await?;
    Ok(Json(response))
}

async fn my_schedule(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<MechanicSchedule>>, AppError> {
    let controller = WorkshopController::new(&state);
    let response = controller.my_schedule(&user).await?;
    Ok(Json(response))
}

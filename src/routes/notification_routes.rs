use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::notification_controller::NotificationController;
use crate::dto::notification_dto::{NotificationResponse, UnreadCountResponse};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_notification_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/:id/read", put(mark_read))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let controller = NotificationController::new(&state);
    let response = controller.list(&user).await?;
    Ok(Json(response))
}

async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let controller = NotificationController::new(&state);
    let response = controller.unread_count(&user).await?;
    Ok(Json(response))
}

async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationResponse>, AppError> {
    let controller = NotificationController::new(&state);
    let response = controller.mark_read(&user, id).await?;
    Ok(Json(response))
}

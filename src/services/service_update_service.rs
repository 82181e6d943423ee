//! Trail de notas de progreso
//!
//! Append-only sobre una solicitud. Escribe solo el mecánico asignado; la
//! lectura conserva los grants amplios heredados a través de la política
//! centralizada.

use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::service_request_dto::AppendUpdateRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::service_update::ServiceUpdate;
use crate::realtime::RealtimePort;
use crate::repositories::service_request_repository::ServiceRequestRepository;
use crate::repositories::service_update_repository::ServiceUpdateRepository;
use crate::services::notification_fanout::NotificationFanout;
use crate::services::policy;
use crate::utils::errors::{forbidden_error, not_found_error, AppResult};

pub struct ServiceUpdateService {
    requests: ServiceRequestRepository,
    updates: ServiceUpdateRepository,
    fanout: NotificationFanout,
}

impl ServiceUpdateService {
    pub fn new(pool: PgPool, realtime: Arc<dyn RealtimePort>) -> Self {
        Self {
            requests: ServiceRequestRepository::new(pool.clone()),
            updates: ServiceUpdateRepository::new(pool.clone()),
            fanout: NotificationFanout::new(pool, realtime),
        }
    }

    pub async fn append(
        &self,
        request_id: Uuid,
        actor: &AuthenticatedUser,
        payload: AppendUpdateRequest,
    ) -> AppResult<ServiceUpdate> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| not_found_error("Service request", &request_id.to_string()))?;

        if !policy::can_append_update(actor, &request) {
            return Err(forbidden_error(
                "append an update",
                "only the mechanic currently assigned to this request can post progress",
            ));
        }

        let update = self
            .updates
            .create(request_id, payload.message, payload.images)
            .await?;

        self.fanout
            .notify_update_appended(&request, &update.message)
            .await;

        Ok(update)
    }

    pub async fn list(
        &self,
        request_id: Uuid,
        actor: &AuthenticatedUser,
    ) -> AppResult<Vec<ServiceUpdate>> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| not_found_error("Service request", &request_id.to_string()))?;

        if !policy::can_read_updates(actor, &request) {
            return Err(forbidden_error(
                "read updates",
                "no access to this request",
            ));
        }

        self.updates.list_by_request(request_id).await
    }
}

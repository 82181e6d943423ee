use crate::models::service_update::ServiceUpdate;
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ServiceUpdateRepository {
    pool: PgPool,
}

impl ServiceUpdateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        service_request_id: Uuid,
        message: String,
        images: Vec<String>,
    ) -> Result<ServiceUpdate, AppError> {
        let id = Uuid::new_v4();

        let update = sqlx::query_as::<_, ServiceUpdate>(
            r#"
            INSERT INTO service_updates (id, service_request_id, message, images, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(service_request_id)
        .bind(message)
        .bind(images)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(update)
    }

    /// Trail de notas, más recientes primero
    pub async fn list_by_request(
        &self,
        service_request_id: Uuid,
    ) -> Result<Vec<ServiceUpdate>, AppError> {
        let updates = sqlx::query_as::<_, ServiceUpdate>(
            "SELECT * FROM service_updates WHERE service_request_id = $1 ORDER BY created_at DESC",
        )
        .bind(service_request_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(updates)
    }
}

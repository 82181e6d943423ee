use crate::dto::service_request_dto::CreateServiceRequestRequest;
use crate::models::service_request::ServiceRequest;
use crate::utils::errors::AppError;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ServiceRequestRepository {
    pool: PgPool,
}

impl ServiceRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        customer_id: Uuid,
        payload: &CreateServiceRequestRequest,
    ) -> Result<ServiceRequest, AppError> {
        let id = Uuid::new_v4();

        let request = sqlx::query_as::<_, ServiceRequest>(
            r#"
            INSERT INTO service_requests
                (id, customer_id, workshop_id, vehicle_make, vehicle_model, vehicle_plate,
                 issue_type, description, urgency, pickup_address, latitude, longitude,
                 images, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 'submitted', $14)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(payload.workshop_id)
        .bind(&payload.vehicle_make)
        .bind(&payload.vehicle_model)
        .bind(&payload.vehicle_plate)
        .bind(&payload.issue_type)
        .bind(&payload.description)
        .bind(payload.urgency)
        .bind(&payload.pickup_address)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .bind(&payload.images)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(request)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceRequest>, AppError> {
        let request =
            sqlx::query_as::<_, ServiceRequest>("SELECT * FROM service_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Database)?;

        Ok(request)
    }

    pub async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<ServiceRequest>, AppError> {
        let requests = sqlx::query_as::<_, ServiceRequest>(
            "SELECT * FROM service_requests WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(requests)
    }

    /// Solicitudes visibles para un admin: las de su taller más las aún no
    /// asignadas a ningún taller (descubrimiento por broadcast).
    pub async fn list_for_workshop_admin(
        &self,
        workshop_id: Uuid,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        let requests = sqlx::query_as::<_, ServiceRequest>(
            r#"
            SELECT * FROM service_requests
            WHERE workshop_id = $1 OR workshop_id IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(workshop_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(requests)
    }

    pub async fn list_by_mechanic(&self, mechanic_id: Uuid) -> Result<Vec<ServiceRequest>, AppError> {
        let requests = sqlx::query_as::<_, ServiceRequest>(
            "SELECT * FROM service_requests WHERE mechanic_id = $1 ORDER BY created_at DESC",
        )
        .bind(mechanic_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(requests)
    }

    pub async fn update_costs(
        &self,
        id: Uuid,
        estimated_cost: Option<Decimal>,
        final_cost: Option<Decimal>,
    ) -> Result<ServiceRequest, AppError> {
        let request = sqlx::query_as::<_, ServiceRequest>(
            r#"
            UPDATE service_requests
            SET estimated_cost = COALESCE($2, estimated_cost),
                final_cost = COALESCE($3, final_cost)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(estimated_cost)
        .bind(final_cost)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(request)
    }
}

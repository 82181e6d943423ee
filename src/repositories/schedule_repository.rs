use crate::models::schedule::MechanicSchedule;
use crate::utils::errors::AppError;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        mechanic_id: Uuid,
        title: String,
        description: Option<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        entry_type: String,
        service_request_id: Option<Uuid>,
    ) -> Result<MechanicSchedule, AppError> {
        let id = Uuid::new_v4();

        let schedule = sqlx::query_as::<_, MechanicSchedule>(
            r#"
            INSERT INTO mechanic_schedules
                (id, mechanic_id, title, description, start_time, end_time, entry_type, service_request_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mechanic_id)
        .bind(title)
        .bind(description)
        .bind(start_time)
        .bind(end_time)
        .bind(entry_type)
        .bind(service_request_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(schedule)
    }

    pub async fn list_by_mechanic(
        &self,
        mechanic_id: Uuid,
    ) -> Result<Vec<MechanicSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, MechanicSchedule>(
            "SELECT * FROM mechanic_schedules WHERE mechanic_id = $1 ORDER BY start_time",
        )
        .bind(mechanic_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(schedules)
    }
}

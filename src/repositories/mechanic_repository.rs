use crate::models::mechanic::Mechanic;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct MechanicRepository {
    pool: PgPool,
}

impl MechanicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Mechanic>, AppError> {
        let mechanic = sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(mechanic)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Mechanic>, AppError> {
        let mechanic = sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(mechanic)
    }

    pub async fn list_by_workshop(&self, workshop_id: Uuid) -> Result<Vec<Mechanic>, AppError> {
        let mechanics = sqlx::query_as::<_, Mechanic>(
            "SELECT * FROM mechanics WHERE workshop_id = $1 ORDER BY full_name",
        )
        .bind(workshop_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(mechanics)
    }
}

use crate::models::workshop::Workshop;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct WorkshopRepository {
    pool: PgPool,
}

impl WorkshopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Workshop>, AppError> {
        let workshop = sqlx::query_as::<_, Workshop>("SELECT * FROM workshops WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(workshop)
    }

    pub async fn find_by_admin(&self, admin_id: Uuid) -> Result<Option<Workshop>, AppError> {
        let workshop = sqlx::query_as::<_, Workshop>("SELECT * FROM workshops WHERE admin_id = $1")
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(workshop)
    }

    /// Talleres abiertos, candidatos para el ranking por cercanía
    pub async fn find_open(&self) -> Result<Vec<Workshop>, AppError> {
        let workshops =
            sqlx::query_as::<_, Workshop>("SELECT * FROM workshops WHERE is_open = TRUE")
                .fetch_all(&self.pool)
                .await
                .map_err(AppError::Database)?;

        Ok(workshops)
    }

    /// Id de usuario y email del admin de un taller, para notificaciones
    pub async fn find_admin_contact(
        &self,
        workshop_id: Uuid,
    ) -> Result<Option<(Uuid, String)>, AppError> {
        let contact: Option<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT u.id, u.email
            FROM users u
            JOIN workshops w ON w.admin_id = u.id
            WHERE w.id = $1
            "#,
        )
        .bind(workshop_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(contact)
    }
}

//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::user::{User, UserRole},
    repositories::mechanic_repository::MechanicRepository,
    repositories::workshop_repository::WorkshopRepository,
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{extract_token_from_header, verify_token, JwtConfig},
};

/// Usuario autenticado que se inyecta en las requests. workshop_id y
/// mechanic_id se resuelven según el rol para que los servicios no repitan
/// el lookup.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
    pub workshop_id: Option<Uuid>,
    pub mechanic_id: Option<Uuid>,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &JwtConfig::from(&state.config))?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;

    // Verificar que el usuario existe y está activo
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("Usuario inactivo o suspendido".to_string()));
    }

    let (workshop_id, mechanic_id) = resolve_affiliation(&state, &user).await?;

    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        role: user.role,
        workshop_id,
        mechanic_id,
    };

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

/// Resolver taller y ficha de mecánico según el rol
async fn resolve_affiliation(
    state: &AppState,
    user: &User,
) -> Result<(Option<Uuid>, Option<Uuid>), AppError> {
    match user.role {
        UserRole::WorkshopAdmin => {
            let workshop = WorkshopRepository::new(state.pool.clone())
                .find_by_admin(user.id)
                .await?;
            Ok((workshop.map(|w| w.id), None))
        }
        UserRole::Mechanic => {
            let mechanic = MechanicRepository::new(state.pool.clone())
                .find_by_user(user.id)
                .await?;
            match mechanic {
                Some(mechanic) => Ok((Some(mechanic.workshop_id), Some(mechanic.id))),
                None => Ok((None, None)),
            }
        }
        UserRole::Customer => Ok((None, None)),
    }
}

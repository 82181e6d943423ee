use crate::dto::workshop_dto::{MechanicSearchQuery, NearbyWorkshopsQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::mechanic::Mechanic;
use crate::models::schedule::MechanicSchedule;
use crate::models::user::UserRole;
use crate::repositories::mechanic_repository::MechanicRepository;
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::repositories::workshop_repository::WorkshopRepository;
use crate::services::geo_ranking::{rank_nearby, RankedPlace, RankedWorkshop, SortKey};
use crate::services::place_search_service::{PlaceSearchService, DEFAULT_SEARCH_TERMS};
use crate::state::AppState;
use crate::utils::errors::{forbidden_error, validation_error, AppError};

pub struct WorkshopController {
    workshops: WorkshopRepository,
    mechanics: MechanicRepository,
    schedules: ScheduleRepository,
    places: PlaceSearchService,
}

impl WorkshopController {
    pub fn new(state: &AppState) -> Self {
        Self {
            workshops: WorkshopRepository::new(state.pool.clone()),
            mechanics: MechanicRepository::new(state.pool.clone()),
            schedules: ScheduleRepository::new(state.pool.clone()),
            places: PlaceSearchService::new(&state.config),
        }
    }

    /// Talleres abiertos ordenados respecto a la coordenada del usuario
    pub async fn nearby(
        &self,
        query: NearbyWorkshopsQuery,
    ) -> Result<Vec<RankedWorkshop>, AppError> {
        if crate::utils::validation::validate_coordinates(query.lat, query.lng).is_err() {
            return Err(validation_error("coordinates", "coordinates out of range"));
        }

        let candidates = self.workshops.find_open().await?;
        let sort_key = SortKey::parse(query.sort_by.as_deref());

        Ok(rank_nearby(
            query.lat,
            query.lng,
            candidates,
            sort_key,
            query.radius_km,
        ))
    }

    /// Agregación de la búsqueda externa de mecánicos, un bucket por término
    pub async fn search_mechanics(
        &self,
        query: MechanicSearchQuery,
    ) -> Result<Vec<RankedPlace>, AppError> {
        if crate::utils::validation::validate_coordinates(query.lat, query.lng).is_err() {
            return Err(validation_error("coordinates", "coordinates out of range"));
        }

        let terms: Vec<String> = match &query.q {
            Some(q) => q
                .split(',')
                .map(|term| term.trim().to_string())
                .filter(|term| !term.is_empty())
                .collect(),
            None => DEFAULT_SEARCH_TERMS.iter().map(|t| t.to_string()).collect(),
        };

        self.places.search_mechanics(query.lat, query.lng, &terms).await
    }

    /// Plantilla del propio taller, para la pantalla de asignación del admin
    pub async fn list_my_mechanics(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<Mechanic>, AppError> {
        if actor.role != UserRole::WorkshopAdmin {
            return Err(forbidden_error(
                "list mechanics",
                "only workshop admins manage mechanics",
            ));
        }
        let workshop_id = actor
            .workshop_id
            .ok_or_else(|| forbidden_error("list mechanics", "admin has no workshop"))?;

        self.mechanics.list_by_workshop(workshop_id).await
    }

    /// Agenda del propio mecánico, incluidos los bloques de asignación
    pub async fn my_schedule(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<MechanicSchedule>, AppError> {
        let mechanic_id = actor.mechanic_id.ok_or_else(|| {
            forbidden_error("read the schedule", "no mechanic profile for this user")
        })?;

        self.schedules.list_by_mechanic(mechanic_id).await
    }
}

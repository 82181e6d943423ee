//! Política de acceso centralizada
//!
//! Decisiones (actor, recurso) -> permitido, puras y testeables sin la capa
//! HTTP. Los grants de lectura conservan la amplitud heredada: cualquier
//! mecánico o admin de taller puede leer solicitudes y su trail de notas.

use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::mechanic::Mechanic;
use crate::models::service_request::ServiceRequest;
use crate::models::user::UserRole;

/// ¿Es este mecánico el asignado actualmente a la solicitud?
pub fn is_assigned_mechanic(mechanic: &Mechanic, request: &ServiceRequest) -> bool {
    request.mechanic_id == Some(mechanic.id)
}

/// Lectura de una solicitud
pub fn can_read_request(actor: &AuthenticatedUser, request: &ServiceRequest) -> bool {
    match actor.role {
        UserRole::Customer => request.customer_id == actor.user_id,
        UserRole::WorkshopAdmin => true,
        UserRole::Mechanic => true,
    }
}

/// Lectura del trail de notas de una solicitud
pub fn can_read_updates(actor: &AuthenticatedUser, request: &ServiceRequest) -> bool {
    can_read_request(actor, request)
}

/// Añadir una nota de progreso: solo el mecánico asignado
pub fn can_append_update(actor: &AuthenticatedUser, request: &ServiceRequest) -> bool {
    actor.role == UserRole::Mechanic
        && actor.mechanic_id.is_some()
        && request.mechanic_id == actor.mechanic_id
        && !request.status.is_terminal()
}

/// Cancelación: el cliente dueño de la solicitud o el mecánico asignado
pub fn can_cancel_request(actor: &AuthenticatedUser, request: &ServiceRequest) -> bool {
    match actor.role {
        UserRole::Customer => request.customer_id == actor.user_id,
        UserRole::Mechanic => {
            actor.mechanic_id.is_some() && request.mechanic_id == actor.mechanic_id
        }
        UserRole::WorkshopAdmin => false,
    }
}

/// Transiciones de progreso (in_progress, reached, completed): solo el
/// mecánico asignado
pub fn can_progress_request(actor: &AuthenticatedUser, request: &ServiceRequest) -> bool {
    actor.role == UserRole::Mechanic
        && actor.mechanic_id.is_some()
        && request.mechanic_id == actor.mechanic_id
}

/// Las notificaciones pertenecen a su destinatario
pub fn can_touch_notification(actor_user_id: Uuid, recipient_user_id: Uuid) -> bool {
    actor_user_id == recipient_user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::service_request::{RequestStatus, Urgency};
    use chrono::Utc;

    fn actor(role: UserRole, mechanic_id: Option<Uuid>) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role,
            workshop_id: None,
            mechanic_id,
        }
    }

    fn request(customer_id: Uuid, mechanic_id: Option<Uuid>, status: RequestStatus) -> ServiceRequest {
        ServiceRequest {
            id: Uuid::new_v4(),
            customer_id,
            workshop_id: None,
            mechanic_id,
            vehicle_make: "Maruti".to_string(),
            vehicle_model: "Swift".to_string(),
            vehicle_plate: Some("CH01AB1234".to_string()),
            issue_type: "flat_tyre".to_string(),
            description: "Rueda pinchada en el arcén".to_string(),
            urgency: Urgency::High,
            pickup_address: "NH-5, Zirakpur".to_string(),
            latitude: 30.7333,
            longitude: 76.7794,
            images: vec![],
            status,
            estimated_cost: None,
            final_cost: None,
            created_at: Utc::now(),
            assigned_at: None,
            started_at: None,
            reached_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_customer_reads_only_own_requests() {
        let customer = actor(UserRole::Customer, None);
        let own = request(customer.user_id, None, RequestStatus::Submitted);
        let other = request(Uuid::new_v4(), None, RequestStatus::Submitted);

        assert!(can_read_request(&customer, &own));
        assert!(!can_read_request(&customer, &other));
    }

    #[test]
    fn test_workshop_roles_have_broad_read() {
        let admin = actor(UserRole::WorkshopAdmin, None);
        let mechanic = actor(UserRole::Mechanic, Some(Uuid::new_v4()));
        let foreign = request(Uuid::new_v4(), None, RequestStatus::Submitted);

        assert!(can_read_request(&admin, &foreign));
        assert!(can_read_request(&mechanic, &foreign));
        assert!(can_read_updates(&admin, &foreign));
        assert!(can_read_updates(&mechanic, &foreign));
    }

    #[test]
    fn test_only_assigned_mechanic_appends_updates() {
        let mechanic_id = Uuid::new_v4();
        let assigned = actor(UserRole::Mechanic, Some(mechanic_id));
        let other = actor(UserRole::Mechanic, Some(Uuid::new_v4()));
        let req = request(Uuid::new_v4(), Some(mechanic_id), RequestStatus::InProgress);

        assert!(can_append_update(&assigned, &req));
        assert!(!can_append_update(&other, &req));
        assert!(!can_append_update(&actor(UserRole::Customer, None), &req));
    }

    #[test]
    fn test_no_updates_on_terminal_requests() {
        let mechanic_id = Uuid::new_v4();
        let assigned = actor(UserRole::Mechanic, Some(mechanic_id));
        let completed = request(Uuid::new_v4(), Some(mechanic_id), RequestStatus::Completed);
        let cancelled = request(Uuid::new_v4(), Some(mechanic_id), RequestStatus::Cancelled);

        assert!(!can_append_update(&assigned, &completed));
        assert!(!can_append_update(&assigned, &cancelled));
    }

    #[test]
    fn test_cancel_rights() {
        let mechanic_id = Uuid::new_v4();
        let customer = actor(UserRole::Customer, None);
        let assigned = actor(UserRole::Mechanic, Some(mechanic_id));
        let admin = actor(UserRole::WorkshopAdmin, None);

        let own = request(customer.user_id, Some(mechanic_id), RequestStatus::Assigned);

        assert!(can_cancel_request(&customer, &own));
        assert!(can_cancel_request(&assigned, &own));
        assert!(!can_cancel_request(&admin, &own));

        let foreign = request(Uuid::new_v4(), None, RequestStatus::Submitted);
        assert!(!can_cancel_request(&customer, &foreign));
    }

    #[test]
    fn test_progress_requires_assignment() {
        let mechanic_id = Uuid::new_v4();
        let assigned = actor(UserRole::Mechanic, Some(mechanic_id));
        let unassigned_actor = actor(UserRole::Mechanic, Some(Uuid::new_v4()));
        let req = request(Uuid::new_v4(), Some(mechanic_id), RequestStatus::Assigned);

        assert!(can_progress_request(&assigned, &req));
        assert!(!can_progress_request(&unassigned_actor, &req));
    }

    #[test]
    fn test_notifications_belong_to_recipient() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(can_touch_notification(a, a));
        assert!(!can_touch_notification(a, b));
    }
}

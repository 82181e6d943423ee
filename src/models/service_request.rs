//! Modelo de ServiceRequest
//!
//! Este módulo contiene el struct ServiceRequest, sus enums de estado y la
//! tabla de transiciones válidas del ciclo de vida. Mapea exactamente a la
//! tabla service_requests del schema PostgreSQL.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de la solicitud - mapea al ENUM request_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Submitted,
    Assigned,
    InProgress,
    Reached,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Submitted => "submitted",
            RequestStatus::Assigned => "assigned",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Reached => "reached",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Un estado terminal no admite más mutaciones de estado
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }

    /// Columna de timestamp que corresponde a entrar en este estado
    pub fn timestamp_column(&self) -> Option<&'static str> {
        match self {
            RequestStatus::Assigned => Some("assigned_at"),
            RequestStatus::InProgress => Some("started_at"),
            RequestStatus::Reached => Some("reached_at"),
            RequestStatus::Completed => Some("completed_at"),
            _ => None,
        }
    }
}

/// Urgencia de la solicitud - mapea al ENUM urgency_level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "urgency_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Tabla fija de transiciones válidas del ciclo de vida
pub const VALID_TRANSITIONS: &[(RequestStatus, RequestStatus)] = &[
    (RequestStatus::Submitted, RequestStatus::Assigned),
    (RequestStatus::Assigned, RequestStatus::InProgress),
    (RequestStatus::InProgress, RequestStatus::Reached),
    (RequestStatus::Reached, RequestStatus::Completed),
    (RequestStatus::Submitted, RequestStatus::Cancelled),
    (RequestStatus::Assigned, RequestStatus::Cancelled),
    (RequestStatus::InProgress, RequestStatus::Cancelled),
    (RequestStatus::Reached, RequestStatus::Cancelled),
];

/// Resultado de consultar la tabla de transiciones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCheck {
    /// Arista válida, aplicar el cambio de estado
    Apply,
    /// El estado ya es el destino, repetición idempotente
    Noop,
    /// Arista fuera de la tabla
    Invalid,
}

/// Validador único de transiciones, consultado por todo punto de entrada
/// que mute el estado de una solicitud.
pub fn check_transition(from: RequestStatus, to: RequestStatus) -> TransitionCheck {
    if from == to {
        return TransitionCheck::Noop;
    }
    if VALID_TRANSITIONS.contains(&(from, to)) {
        TransitionCheck::Apply
    } else {
        TransitionCheck::Invalid
    }
}

/// ServiceRequest principal - mapea exactamente a la tabla service_requests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceRequest {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub workshop_id: Option<Uuid>,
    pub mechanic_id: Option<Uuid>,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_plate: Option<String>,
    pub issue_type: String,
    pub description: String,
    pub urgency: Urgency,
    pub pickup_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub images: Vec<String>,
    pub status: RequestStatus,
    pub estimated_cost: Option<Decimal>,
    pub final_cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub reached_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_edges_apply() {
        for (from, to) in VALID_TRANSITIONS {
            assert_eq!(
                check_transition(*from, *to),
                TransitionCheck::Apply,
                "{:?} -> {:?} should be a valid edge",
                from,
                to
            );
        }
    }

    #[test]
    fn test_repeating_a_transition_is_noop() {
        assert_eq!(
            check_transition(RequestStatus::InProgress, RequestStatus::InProgress),
            TransitionCheck::Noop
        );
        assert_eq!(
            check_transition(RequestStatus::Cancelled, RequestStatus::Cancelled),
            TransitionCheck::Noop
        );
    }

    #[test]
    fn test_stage_skipping_is_invalid() {
        assert_eq!(
            check_transition(RequestStatus::Submitted, RequestStatus::Reached),
            TransitionCheck::Invalid
        );
        assert_eq!(
            check_transition(RequestStatus::Submitted, RequestStatus::InProgress),
            TransitionCheck::Invalid
        );
        assert_eq!(
            check_transition(RequestStatus::Assigned, RequestStatus::Completed),
            TransitionCheck::Invalid
        );
    }

    #[test]
    fn test_terminal_states_are_frozen() {
        let all = [
            RequestStatus::Submitted,
            RequestStatus::Assigned,
            RequestStatus::InProgress,
            RequestStatus::Reached,
            RequestStatus::Completed,
            RequestStatus::Cancelled,
        ];
        for target in all {
            if target != RequestStatus::Completed {
                assert_eq!(
                    check_transition(RequestStatus::Completed, target),
                    TransitionCheck::Invalid
                );
            }
            if target != RequestStatus::Cancelled {
                assert_eq!(
                    check_transition(RequestStatus::Cancelled, target),
                    TransitionCheck::Invalid
                );
            }
        }
    }

    #[test]
    fn test_nothing_transitions_back_to_submitted() {
        for from in [
            RequestStatus::Assigned,
            RequestStatus::InProgress,
            RequestStatus::Reached,
            RequestStatus::Completed,
            RequestStatus::Cancelled,
        ] {
            assert_eq!(check_transition(from, RequestStatus::Submitted), TransitionCheck::Invalid);
        }
    }

    #[test]
    fn test_timestamp_columns() {
        assert_eq!(RequestStatus::Assigned.timestamp_column(), Some("assigned_at"));
        assert_eq!(RequestStatus::InProgress.timestamp_column(), Some("started_at"));
        assert_eq!(RequestStatus::Reached.timestamp_column(), Some("reached_at"));
        assert_eq!(RequestStatus::Completed.timestamp_column(), Some("completed_at"));
        assert_eq!(RequestStatus::Cancelled.timestamp_column(), None);
        assert_eq!(RequestStatus::Submitted.timestamp_column(), None);
    }
}

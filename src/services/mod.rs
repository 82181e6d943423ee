//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: la máquina
//! de estados de las solicitudes, el coordinador de asignaciones, el fanout
//! de notificaciones, el ranking geográfico y los colaboradores externos.

pub mod assignment_service;
pub mod email_service;
pub mod geo_ranking;
pub mod lifecycle_service;
pub mod notification_fanout;
pub mod place_search_service;
pub mod policy;
pub mod service_update_service;

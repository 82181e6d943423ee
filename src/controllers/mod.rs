//! Controllers del sistema
//!
//! Orquestan DTOs, servicios y repositorios para cada recurso de la API.

pub mod notification_controller;
pub mod service_request_controller;
pub mod workshop_controller;

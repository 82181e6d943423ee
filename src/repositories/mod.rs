//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula las consultas SQL de una tabla. Las unidades
//! compuestas (asignación, transición de estado) viven en los servicios,
//! que las ejecutan dentro de una transacción.

pub mod mechanic_repository;
pub mod notification_repository;
pub mod schedule_repository;
pub mod service_request_repository;
pub mod service_update_repository;
pub mod workshop_repository;

//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod mechanic;
pub mod notification;
pub mod schedule;
pub mod service_request;
pub mod service_update;
pub mod user;
pub mod workshop;

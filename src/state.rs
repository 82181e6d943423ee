//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::realtime::{RealtimeHub, RealtimePort};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub realtime: Arc<RealtimeHub>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            realtime: Arc::new(RealtimeHub::new()),
        }
    }

    /// Puerto de tiempo real inyectable en los servicios
    pub fn realtime_port(&self) -> Arc<dyn RealtimePort> {
        self.realtime.clone()
    }
}

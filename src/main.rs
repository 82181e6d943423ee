mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod realtime;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🛠️ Roadside Assist - Coordinación de servicios de taller");
    info!("========================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    let pool = db_connection.pool().clone();

    // CORS según entorno
    let cors = if config.is_production() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone());
    let app = routes::create_api_router(app_state).layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🆘 Endpoints - Solicitudes:");
    info!("   POST /api/request - Crear solicitud");
    info!("   GET  /api/request - Listar solicitudes del actor");
    info!("   GET  /api/request/:id - Obtener solicitud");
    info!("   POST /api/request/:id/assign - Asignar mecánico");
    info!("   POST /api/request/:id/status - Transición de estado");
    info!("   POST /api/request/:id/cost - Actualizar costes");
    info!("   POST /api/request/:id/update - Añadir nota de progreso");
    info!("   GET  /api/request/:id/update - Trail de notas");
    info!("🏪 Endpoints - Talleres:");
    info!("   GET  /api/workshop/nearby - Talleres cercanos ordenados");
    info!("   GET  /api/workshop/search-mechanics - Búsqueda externa agregada");
    info!("   GET  /api/workshop/mechanics - Mecánicos del propio taller");
    info!("   GET  /api/workshop/my-schedule - Agenda del mecánico");
    info!("🔔 Endpoints - Notificaciones:");
    info!("   GET  /api/notification - Notificaciones del usuario");
    info!("   GET  /api/notification/unread-count - Recuento de no leídas");
    info!("   PUT  /api/notification/:id/read - Marcar como leída");
    info!("⚡ Tiempo real:");
    info!("   GET  /ws - WebSocket con salas por usuario/mecánico");

    // Iniciar servidor
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}

//! Colaborador de email
//!
//! Envío de plantillas por HTTP a un proveedor externo. Best-effort: se
//! invoca al crear una solicitud con taller preseleccionado y su fallo
//! nunca se propaga a la operación primaria.

use serde_json::json;

use crate::config::environment::EnvironmentConfig;
use crate::models::service_request::ServiceRequest;
use crate::utils::errors::{AppError, AppResult};

pub struct EmailService {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    from: String,
}

impl EmailService {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
        }
    }

    /// Aviso al admin del taller preseleccionado de que entró una solicitud
    pub async fn send_request_received(
        &self,
        to_email: &str,
        request: &ServiceRequest,
    ) -> AppResult<()> {
        let endpoint = match &self.endpoint {
            Some(endpoint) => endpoint,
            None => {
                log::debug!("Colaborador de email no configurado, se omite el envío");
                return Ok(());
            }
        };

        let body = json!({
            "from": self.from,
            "to": to_email,
            "subject": "Nueva solicitud de servicio",
            "text": format!(
                "Ha llegado una solicitud de {} {} ({}) en {}. Urgencia: {:?}.",
                request.vehicle_make,
                request.vehicle_model,
                request.issue_type,
                request.pickup_address,
                request.urgency,
            ),
        });

        let mut http_request = self.client.post(endpoint).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| AppError::ExternalCollaborator(format!("email provider: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalCollaborator(format!(
                "email provider returned {}",
                response.status()
            )));
        }

        log::info!("📧 Email de nueva solicitud enviado a {}", to_email);
        Ok(())
    }
}

//! Búsqueda externa de mecánicos
//!
//! Agrega resultados del colaborador de búsqueda de lugares: un bucket por
//! término de consulta, descargados en paralelo. Un bucket que falla se
//! aísla (queda vacío) y no tumba a los demás; la fusión y el ranking son
//! de geo_ranking.

use serde::Deserialize;

use crate::config::environment::EnvironmentConfig;
use crate::services::geo_ranking::{merge_external_results, ExternalPlace, RankedPlace};
use crate::utils::errors::{bad_request_error, AppError, AppResult};

/// Términos usados cuando el cliente no especifica los suyos
pub const DEFAULT_SEARCH_TERMS: &[&str] = &["car repair", "mechanic", "workshop"];

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    results: Vec<ProviderPlace>,
}

#[derive(Debug, Deserialize)]
struct ProviderPlace {
    place_id: String,
    name: String,
    vicinity: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<i64>,
    geometry: ProviderGeometry,
}

#[derive(Debug, Deserialize)]
struct ProviderGeometry {
    location: ProviderLocation,
}

#[derive(Debug, Deserialize)]
struct ProviderLocation {
    lat: f64,
    lng: f64,
}

impl From<ProviderPlace> for ExternalPlace {
    fn from(place: ProviderPlace) -> Self {
        Self {
            external_id: place.place_id,
            name: place.name,
            address: place.vicinity,
            latitude: place.geometry.location.lat,
            longitude: place.geometry.location.lng,
            rating: place.rating,
            review_count: place.user_ratings_total,
        }
    }
}

pub struct PlaceSearchService {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl PlaceSearchService {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.places_api_url.clone(),
            api_key: config.places_api_key.clone(),
        }
    }

    /// Fan-out por término y fusión con tolerancia a fallos parciales
    pub async fn search_mechanics(
        &self,
        latitude: f64,
        longitude: f64,
        terms: &[String],
    ) -> AppResult<Vec<RankedPlace>> {
        let base_url = self
            .base_url
            .as_ref()
            .ok_or_else(|| bad_request_error("external mechanic search is not configured"))?;

        log::info!(
            "🔎 Búsqueda externa con {} términos cerca de ({}, {})",
            terms.len(),
            latitude,
            longitude
        );

        let fetches = terms
            .iter()
            .map(|term| self.fetch_bucket(base_url, term, latitude, longitude));
        let outcomes = futures::future::join_all(fetches).await;

        let mut buckets = Vec::with_capacity(terms.len());
        for (term, outcome) in terms.iter().zip(outcomes) {
            match outcome {
                Ok(bucket) => buckets.push(bucket),
                Err(e) => {
                    log::warn!("⚠️ Bucket '{}' descartado: {}", term, e);
                    buckets.push(Vec::new());
                }
            }
        }

        Ok(merge_external_results(buckets, latitude, longitude))
    }

    async fn fetch_bucket(
        &self,
        base_url: &str,
        term: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ExternalPlace>, AppError> {
        let mut url = format!(
            "{}/search?query={}&lat={}&lng={}",
            base_url,
            urlencoding::encode(term),
            latitude,
            longitude
        );
        if let Some(key) = &self.api_key {
            url.push_str(&format!("&key={}", key));
        }

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalCollaborator(format!("place search: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalCollaborator(format!(
                "place search returned {}",
                response.status()
            )));
        }

        let parsed: ProviderResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalCollaborator(format!("place search payload: {}", e)))?;

        Ok(parsed.results.into_iter().map(ExternalPlace::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_payload_mapping() {
        let payload = r#"{
            "results": [
                {
                    "place_id": "ChIJabc123",
                    "name": "Singh Auto Garage",
                    "vicinity": "Sector 22, Chandigarh",
                    "rating": 4.3,
                    "user_ratings_total": 120,
                    "geometry": { "location": { "lat": 30.7333, "lng": 76.7794 } }
                },
                {
                    "place_id": "ChIJdef456",
                    "name": "Roadside Hero",
                    "geometry": { "location": { "lat": 30.74, "lng": 76.78 } }
                }
            ]
        }"#;

        let parsed: ProviderResponse = serde_json::from_str(payload).unwrap();
        let places: Vec<ExternalPlace> = parsed.results.into_iter().map(ExternalPlace::from).collect();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].external_id, "ChIJabc123");
        assert_eq!(places[0].rating, Some(4.3));
        assert_eq!(places[0].review_count, Some(120));
        assert_eq!(places[1].rating, None);
        assert_eq!(places[1].address, None);
    }

    #[test]
    fn test_unconfigured_search_is_rejected() {
        let config = EnvironmentConfig {
            environment: "test".to_string(),
            port: 0,
            host: "localhost".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_expiration: 3600,
            cors_origins: vec![],
            places_api_url: None,
            places_api_key: None,
            email_api_url: None,
            email_api_key: None,
            email_from: "noreply@test".to_string(),
        };
        let service = PlaceSearchService::new(&config);

        let err = futures::executor::block_on(service.search_mechanics(30.0, 76.0, &[]))
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}

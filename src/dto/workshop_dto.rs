use serde::Deserialize;

/// Query para el ranking de talleres cercanos
#[derive(Debug, Deserialize)]
pub struct NearbyWorkshopsQuery {
    pub lat: f64,
    pub lng: f64,
    /// "distance" (defecto) o "rating"
    pub sort_by: Option<String>,
    pub radius_km: Option<f64>,
}

/// Query para la búsqueda externa de mecánicos
#[derive(Debug, Deserialize)]
pub struct MechanicSearchQuery {
    pub lat: f64,
    pub lng: f64,
    /// Términos separados por comas; si falta se usan los de defecto
    pub q: Option<String>,
}

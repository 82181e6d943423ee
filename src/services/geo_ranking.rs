//! Ranking geográfico
//!
//! Funciones puras de distancia y ordenación de candidatos. Sin dependencias
//! de estado: los flujos de descubrimiento las invocan con los candidatos ya
//! cargados.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::workshop::Workshop;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Máximo de resultados tras la fusión de búsquedas externas
pub const MAX_MERGED_RESULTS: usize = 20;

/// Distancia de gran círculo (haversine), redondeada a 1 decimal
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    ((EARTH_RADIUS_KM * c) * 10.0).round() / 10.0
}

/// Clave de ordenación para talleres cercanos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Distance,
    Rating,
}

impl SortKey {
    pub fn parse(value: Option<&str>) -> SortKey {
        match value {
            Some("rating") => SortKey::Rating,
            _ => SortKey::Distance,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedWorkshop {
    #[serde(flatten)]
    pub workshop: Workshop,
    pub distance_km: f64,
}

/// Ranking de talleres abiertos respecto a la coordenada del usuario.
/// La ordenación es estable: a igualdad de clave se conserva el orden
/// original de los candidatos.
pub fn rank_nearby(
    user_lat: f64,
    user_lng: f64,
    candidates: Vec<Workshop>,
    sort_key: SortKey,
    radius_km: Option<f64>,
) -> Vec<RankedWorkshop> {
    let mut ranked: Vec<RankedWorkshop> = candidates
        .into_iter()
        .map(|workshop| {
            let distance = distance_km(user_lat, user_lng, workshop.latitude, workshop.longitude);
            RankedWorkshop {
                workshop,
                distance_km: distance,
            }
        })
        .filter(|entry| radius_km.map_or(true, |radius| entry.distance_km <= radius))
        .collect();

    match sort_key {
        SortKey::Distance => ranked.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Rating => ranked.sort_by(|a, b| {
            b.workshop
                .rating
                .partial_cmp(&a.workshop.rating)
                .unwrap_or(Ordering::Equal)
        }),
    }

    ranked
}

/// Resultado del colaborador externo de búsqueda de lugares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalPlace {
    pub external_id: String,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedPlace {
    #[serde(flatten)]
    pub place: ExternalPlace,
    pub distance_km: f64,
}

/// Fusión de buckets de resultados externos (uno por término de búsqueda):
/// de-duplica por identificador externo (gana la primera aparición), calcula
/// la distancia al usuario y ordena por la puntuación ponderada
/// 0.7*(distA-distB) + 0.3*(ratingB-ratingA). La fórmula se conserva tal
/// cual, sin normalizar. Rating ausente cuenta como 0.
pub fn merge_external_results(
    buckets: Vec<Vec<ExternalPlace>>,
    user_lat: f64,
    user_lng: f64,
) -> Vec<RankedPlace> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<RankedPlace> = Vec::new();

    for bucket in buckets {
        for place in bucket {
            if seen.insert(place.external_id.clone()) {
                let distance = distance_km(user_lat, user_lng, place.latitude, place.longitude);
                merged.push(RankedPlace {
                    place,
                    distance_km: distance,
                });
            }
        }
    }

    merged.sort_by(|a, b| {
        let rating_a = a.place.rating.unwrap_or(0.0);
        let rating_b = b.place.rating.unwrap_or(0.0);
        let score = 0.7 * (a.distance_km - b.distance_km) + 0.3 * (rating_b - rating_a);
        score.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
    });

    merged.truncate(MAX_MERGED_RESULTS);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn workshop(name: &str, lat: f64, lng: f64, rating: f64) -> Workshop {
        Workshop {
            id: Uuid::new_v4(),
            admin_id: Uuid::new_v4(),
            name: name.to_string(),
            address: "Sector 17, Chandigarh".to_string(),
            latitude: lat,
            longitude: lng,
            is_open: true,
            rating,
            review_count: 10,
        }
    }

    fn place(external_id: &str, lat: f64, lng: f64, rating: Option<f64>) -> ExternalPlace {
        ExternalPlace {
            external_id: external_id.to_string(),
            name: format!("Taller {}", external_id),
            address: None,
            latitude: lat,
            longitude: lng,
            rating,
            review_count: Some(5),
        }
    }

    #[test]
    fn test_distance_zero_for_identical_points() {
        assert_eq!(distance_km(30.7333, 76.7794, 30.7333, 76.7794), 0.0);
        assert_eq!(distance_km(-45.0, 170.0, -45.0, 170.0), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let d1 = distance_km(30.7333, 76.7794, 28.6139, 77.2090);
        let d2 = distance_km(28.6139, 77.2090, 30.7333, 76.7794);
        assert!((d1 - d2).abs() < 0.1);
    }

    #[test]
    fn test_distance_short_hop() {
        // Dos puntos a unos 150 metros en Chandigarh
        let d = distance_km(30.7333, 76.7794, 30.7343, 76.7804);
        assert!((d - 0.15).abs() <= 0.05, "unexpected distance {}", d);
    }

    #[test]
    fn test_rank_nearby_by_distance_is_ascending() {
        let user = (30.7333, 76.7794);
        let candidates = vec![
            workshop("lejos", 30.80, 76.85, 4.0),
            workshop("cerca", 30.7343, 76.7804, 3.0),
            workshop("medio", 30.76, 76.80, 5.0),
        ];

        let ranked = rank_nearby(user.0, user.1, candidates, SortKey::Distance, None);

        assert_eq!(ranked.len(), 3);
        for pair in ranked.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
        assert_eq!(ranked[0].workshop.name, "cerca");
    }

    #[test]
    fn test_rank_nearby_by_rating_is_descending() {
        let candidates = vec![
            workshop("a", 30.76, 76.80, 2.0),
            workshop("b", 30.7343, 76.7804, 4.0),
            workshop("c", 30.75, 76.79, 3.0),
        ];

        let ranked = rank_nearby(30.7333, 76.7794, candidates, SortKey::Rating, None);

        assert_eq!(ranked[0].workshop.rating, 4.0);
        assert_eq!(ranked[1].workshop.rating, 3.0);
        assert_eq!(ranked[2].workshop.rating, 2.0);
    }

    #[test]
    fn test_rank_nearby_is_stable_on_equal_keys() {
        // Misma coordenada, misma distancia: debe conservarse el orden original
        let candidates = vec![
            workshop("primero", 30.75, 76.79, 4.0),
            workshop("segundo", 30.75, 76.79, 4.0),
            workshop("tercero", 30.75, 76.79, 4.0),
        ];

        let ranked = rank_nearby(30.7333, 76.7794, candidates, SortKey::Distance, None);

        assert_eq!(ranked[0].workshop.name, "primero");
        assert_eq!(ranked[1].workshop.name, "segundo");
        assert_eq!(ranked[2].workshop.name, "tercero");
    }

    #[test]
    fn test_rank_nearby_radius_filter() {
        let candidates = vec![
            workshop("cerca", 30.7343, 76.7804, 3.0),
            workshop("lejos", 31.5, 77.5, 5.0),
        ];

        let ranked = rank_nearby(30.7333, 76.7794, candidates, SortKey::Distance, Some(5.0));

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].workshop.name, "cerca");
    }

    #[test]
    fn test_merge_dedupes_first_occurrence_wins() {
        let bucket_a = vec![place("p1", 30.74, 76.78, Some(4.0))];
        let bucket_b = vec![
            place("p1", 99.0, 99.0, Some(1.0)), // duplicado, debe ignorarse
            place("p2", 30.75, 76.79, Some(3.0)),
        ];

        let merged = merge_external_results(vec![bucket_a, bucket_b], 30.7333, 76.7794);

        assert_eq!(merged.len(), 2);
        let p1 = merged.iter().find(|r| r.place.external_id == "p1").unwrap();
        assert_eq!(p1.place.latitude, 30.74);
    }

    #[test]
    fn test_merge_truncates_to_twenty() {
        let bucket: Vec<ExternalPlace> = (0..30)
            .map(|i| place(&format!("p{}", i), 30.74 + i as f64 * 0.01, 76.78, Some(3.0)))
            .collect();

        let merged = merge_external_results(vec![bucket], 30.7333, 76.7794);

        assert_eq!(merged.len(), MAX_MERGED_RESULTS);
    }

    #[test]
    fn test_merge_score_ordering() {
        // A igual rating, manda la distancia
        let bucket = vec![
            place("lejos", 30.90, 76.90, Some(4.0)),
            place("cerca", 30.7343, 76.7804, Some(4.0)),
        ];

        let merged = merge_external_results(vec![bucket], 30.7333, 76.7794);

        assert_eq!(merged[0].place.external_id, "cerca");

        // Puntuaciones pairwise consistentes en adyacentes
        for pair in merged.windows(2) {
            let ra = pair[0].place.rating.unwrap_or(0.0);
            let rb = pair[1].place.rating.unwrap_or(0.0);
            let score = 0.7 * (pair[0].distance_km - pair[1].distance_km) + 0.3 * (rb - ra);
            assert!(score <= 0.0);
        }
    }

    #[test]
    fn test_merge_missing_rating_defaults_to_zero() {
        // Misma distancia: el que tiene rating gana al que no lo tiene
        let bucket = vec![
            place("sin_rating", 30.75, 76.79, None),
            place("con_rating", 30.75, 76.79, Some(4.5)),
        ];

        let merged = merge_external_results(vec![bucket], 30.7333, 76.7794);

        assert_eq!(merged[0].place.external_id, "con_rating");
    }
}

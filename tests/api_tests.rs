use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Json;
use axum::routing::get;
use serde_json::json;
use tower::ServiceExt;

// Los flujos completos (asignación, transiciones) necesitan una base de
// datos; sus reglas de decisión están cubiertas por los tests unitarios de
// los servicios. Aquí se comprueba la forma del contrato HTTP con un router
// mínimo.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "roadside-assist",
        "status": "healthy",
    }))
}

fn create_test_app() -> axum::Router {
    axum::Router::new().route("/health", get(health))
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["service"], "roadside-assist");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

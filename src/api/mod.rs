//! HTTP API
//!
//! Route configuration for the nest. Wire formats and status codes follow
//! the original simulator so existing clients keep working.

mod error;
mod handlers;

use axum::routing::{get, post};
use axum::Router;

use crate::engine::SharedNestSim;

pub use error::{status_for, ErrorResponse};
pub use handlers::{ConfirmParams, FlightRequest, SuccessResponse};

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    pub sim: SharedNestSim,
}

/// Create the full router.
pub fn router(sim: SharedNestSim) -> Router {
    Router::new()
        // Clock
        .route("/time", get(handlers::get_time))
        .route("/step_time", post(handlers::step_time))
        // Flights
        .route("/flight", post(handlers::create_flight))
        .route("/flight/:id", get(handlers::get_flight))
        .route("/flight/:id/cancel", post(handlers::cancel_flight))
        .route("/flight/:id/confirm", post(handlers::confirm_flight))
        .route("/flights", get(handlers::list_flights))
        // Registries
        .route("/hospitals", get(handlers::list_hospitals))
        .route("/inventory", get(handlers::list_inventory))
        .with_state(ApiState { sim })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dst::SimConfig;
    use crate::engine::{new_shared, NestSim};
    use crate::flight::{FlightState, FlightView};
    use crate::hospital::{HospitalRecord, HospitalView};
    use crate::inventory::{Product, ProductView};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn create_test_sim() -> SharedNestSim {
        let sim = NestSim::new(
            SimConfig::with_seed(42),
            vec![HospitalRecord {
                id: 1,
                name: "Bigogwe".to_string(),
                distance_m: 600.0,
            }],
            vec![
                Product {
                    id: 1,
                    name: "RBC A+ Adult".to_string(),
                    mass_g: 100.0,
                    quantity: 1,
                },
                Product {
                    id: 2,
                    name: "RBC B+ Adult".to_string(),
                    mass_g: 1000.0,
                    quantity: 5,
                },
            ],
        )
        .unwrap();
        new_shared(sim)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_router_time_and_step() {
        let app = router(create_test_sim());

        let (status, body) = send(&app, "GET", "/time", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse::<i64>(&body), 0);

        let (status, body) = send(&app, "POST", "/step_time", Some("25")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(parse::<SuccessResponse>(&body).success);

        let (_, body) = send(&app, "GET", "/time", None).await;
        assert_eq!(parse::<i64>(&body), 25);
    }

    #[tokio::test]
    async fn test_router_step_time_rejections() {
        let app = router(create_test_sim());

        let (status, body) = send(&app, "POST", "/step_time", Some("-1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(parse::<ErrorResponse>(&body).error.contains("backwards"));

        let (status, _) = send(&app, "POST", "/step_time", Some("\"ten\"")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "POST", "/step_time", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse::<ErrorResponse>(&body).error, "Expected JSON input");
    }

    #[tokio::test]
    async fn test_router_registries() {
        let app = router(create_test_sim());

        let (status, body) = send(&app, "GET", "/hospitals", None).await;
        assert_eq!(status, StatusCode::OK);
        let hospitals: Vec<HospitalView> = parse(&body);
        assert_eq!(hospitals[0].flight_time_s, 20);

        let (status, body) = send(&app, "GET", "/inventory", None).await;
        assert_eq!(status, StatusCode::OK);
        let raw: serde_json::Value = parse(&body);
        assert_eq!(raw[0]["product"], "RBC A+ Adult");
        let products: Vec<ProductView> = parse(&body);
        assert_eq!(products.len(), 2);
    }

    #[tokio::test]
    async fn test_router_flight_lifecycle() {
        let app = router(create_test_sim());

        let (status, body) = send(
            &app,
            "POST",
            "/flight",
            Some(r#"{"hospital": 1, "products": [1]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let flight: FlightView = parse(&body);
        assert_eq!(flight.state, FlightState::Pending);

        let (status, _) = send(&app, "POST", "/flight/1/confirm?fail=0", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "POST", "/flight/1/cancel", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        send(&app, "POST", "/step_time", Some("1000")).await;

        let (status, body) = send(&app, "GET", "/flight/1", None).await;
        assert_eq!(status, StatusCode::OK);
        let flight: FlightView = parse(&body);
        assert_eq!(flight.state, FlightState::Complete);
        assert!(flight.delivered);
        assert_eq!(flight.note.as_deref(), Some("Flight delivered successfully"));

        let (_, body) = send(&app, "GET", "/flights", None).await;
        assert_eq!(parse::<Vec<FlightView>>(&body).len(), 1);
    }

    #[tokio::test]
    async fn test_router_flight_rejections() {
        let app = router(create_test_sim());

        let (status, _) = send(&app, "POST", "/flight", Some(r#"{"hospital": 1}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/flight",
            Some(r#"{"hospital": 7, "products": [1]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            "POST",
            "/flight",
            Some(r#"{"hospital": 1, "products": [2, 2]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(parse::<ErrorResponse>(&body).error.contains("exceeds threshold"));

        let (status, _) = send(
            &app,
            "POST",
            "/flight",
            Some(r#"{"hospital": 1, "products": [1, 1]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, "GET", "/flight/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "POST", "/flight/99/confirm?fail=yes", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_router_malformed_flight_id_is_json() {
        let app = router(create_test_sim());

        for (method, uri) in [
            ("GET", "/flight/-1"),
            ("GET", "/flight/abc"),
            ("POST", "/flight/-1/cancel"),
            ("POST", "/flight/1.5/confirm"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
            assert!(parse::<ErrorResponse>(&body).error.starts_with("Invalid flight id"));
        }
    }
}

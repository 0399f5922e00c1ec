//! HTTP request handlers.
//!
//! Each handler holds the engine lock for the whole call, so requests are
//! applied one at a time.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiState;
use crate::error::{NestError, NestResult};
use crate::flight::{FlightId, FlightView};
use crate::hospital::{HospitalId, HospitalView};
use crate::inventory::{ProductId, ProductView};

/// Body of `POST /flight`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlightRequest {
    pub hospital: HospitalId,
    pub products: Vec<ProductId>,
}

/// Query of `POST /flight/:id/confirm`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmParams {
    pub fail: Option<String>,
}

/// Acknowledgement body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

const SUCCESS: Json<SuccessResponse> = Json(SuccessResponse { success: true });

fn json_body(body: Result<Json<Value>, JsonRejection>) -> NestResult<Value> {
    body.map(|Json(value)| value)
        .map_err(|_| NestError::Validation("Expected JSON input".to_string()))
}

fn flight_id(path: Result<Path<FlightId>, PathRejection>) -> NestResult<FlightId> {
    path.map(|Path(id)| id)
        .map_err(|rejection| NestError::Validation(format!("Invalid flight id: {rejection}")))
}

fn parse_fail_flag(raw: &str) -> NestResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(NestError::Validation(format!(
            "fail must be 0, 1, true or false, got {raw:?}"
        ))),
    }
}

// =============================================================================
// Time
// =============================================================================

/// `GET /time`
pub async fn get_time(State(state): State<ApiState>) -> Json<i64> {
    let now = state.sim.lock().await.now();
    Json(now)
}

/// `POST /step_time` with a JSON integer body.
pub async fn step_time(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> NestResult<Json<SuccessResponse>> {
    let step = json_body(body)?
        .as_i64()
        .ok_or_else(|| NestError::Validation("Step must be specified as 'int'".to_string()))?;

    state.sim.lock().await.step_time(step)?;
    Ok(SUCCESS)
}

// =============================================================================
// Flights
// =============================================================================

/// `POST /flight`
pub async fn create_flight(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> NestResult<Json<FlightView>> {
    let request: FlightRequest = serde_json::from_value(json_body(body)?).map_err(|_| {
        NestError::Validation(
            "Flight must be specified as 'dict': {'hospital': id, 'products': [id1, id2, ...]}"
                .to_string(),
        )
    })?;

    let view = state
        .sim
        .lock()
        .await
        .create_flight(request.hospital, request.products)?;
    Ok(Json(view))
}

/// `POST /flight/:id/cancel`
pub async fn cancel_flight(
    State(state): State<ApiState>,
    path: Result<Path<FlightId>, PathRejection>,
) -> NestResult<Json<SuccessResponse>> {
    let id = flight_id(path)?;
    state.sim.lock().await.cancel_flight(id)?;
    Ok(SUCCESS)
}

/// `POST /flight/:id/confirm[?fail=0|1]`
pub async fn confirm_flight(
    State(state): State<ApiState>,
    path: Result<Path<FlightId>, PathRejection>,
    Query(params): Query<ConfirmParams>,
) -> NestResult<Json<SuccessResponse>> {
    let id = flight_id(path)?;
    let fail_override = params.fail.as_deref().map(parse_fail_flag).transpose()?;

    state.sim.lock().await.confirm_flight(id, fail_override)?;
    Ok(SUCCESS)
}

/// `GET /flight/:id`
pub async fn get_flight(
    State(state): State<ApiState>,
    path: Result<Path<FlightId>, PathRejection>,
) -> NestResult<Json<FlightView>> {
    let id = flight_id(path)?;
    let view = state.sim.lock().await.get_flight(id)?;
    Ok(Json(view))
}

/// `GET /flights`
pub async fn list_flights(State(state): State<ApiState>) -> Json<Vec<FlightView>> {
    let flights = state.sim.lock().await.list_flights();
    Json(flights)
}

// =============================================================================
// Registries
// =============================================================================

/// `GET /hospitals`
pub async fn list_hospitals(State(state): State<ApiState>) -> Json<Vec<HospitalView>> {
    let hospitals = state.sim.lock().await.list_hospitals();
    Json(hospitals)
}

/// `GET /inventory`
pub async fn list_inventory(State(state): State<ApiState>) -> Json<Vec<ProductView>> {
    let products = state.sim.lock().await.list_inventory();
    Json(products)
}

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::SupplyMapError;
use crate::query::{EntitySummary, MapView, DEFAULT_DEPTH};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct SupplyChainRequest {
    pub company_id: String,
    #[serde(default = "default_depth")]
    pub depth: usize,
}

fn default_depth() -> usize {
    DEFAULT_DEPTH
}

#[derive(Debug, Deserialize)]
pub struct ImpactRequest {
    pub scenario: String,
    pub target_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<SupplyMapError> for ApiError {
    fn from(err: SupplyMapError) -> Self {
        if err.is_client_error() {
            Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            }
        } else {
            error!(error = %err, "request failed");
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse { error: self.message });
        (self.status, body).into_response()
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntitySummary>>, ApiError> {
    Ok(Json(state.engine.list_companies().await?))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntitySummary>>, ApiError> {
    Ok(Json(state.engine.list_suppliers().await?))
}

pub async fn list_ports(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntitySummary>>, ApiError> {
    Ok(Json(state.engine.list_ports().await?))
}

pub async fn supply_chain(
    State(state): State<AppState>,
    payload: Result<Json<SupplyChainRequest>, JsonRejection>,
) -> Result<Json<MapView>, ApiError> {
    let Json(request) = payload?;
    let view = state
        .engine
        .get_supply_chain(&request.company_id, request.depth)
        .await?;
    Ok(Json(view))
}

pub async fn impact(
    State(state): State<AppState>,
    payload: Result<Json<ImpactRequest>, JsonRejection>,
) -> Result<Json<MapView>, ApiError> {
    let Json(request) = payload?;
    let view = state
        .engine
        .get_impact(&request.scenario, &request.target_id)
        .await?;
    Ok(Json(view))
}

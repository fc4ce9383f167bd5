//! HTTP surface for the pipeline.
//!
//! `POST /api/travelPlanGenerator` takes a trip request body and answers with
//! the generated itinerary. Failure details are logged, never returned.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::{
    core::Pipeline,
    error::{PipelineError, MISSING_FIELDS_MESSAGE},
    types::{Itinerary, TripRequest},
};

pub const GENERATION_FAILED_MESSAGE: &str = "Error generating travel plan";
pub const GENERATION_SUCCEEDED_MESSAGE: &str = "Travel plan generated successfully";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub message: &'static str,
    pub data: Itinerary,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

/// Client-safe rendering of a pipeline failure.
#[derive(Debug)]
pub enum ApiError {
    BadRequest,
    Internal,
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest
        } else {
            ApiError::Internal
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest => (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED_MESSAGE),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/travelPlanGenerator", post(generate_travel_plan))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { pipeline })
}

pub async fn serve(addr: SocketAddr, pipeline: Arc<Pipeline>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(target: "itinerary::server", %addr, "listening");
    axum::serve(listener, router(pipeline)).await
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate_travel_plan(
    State(state): State<AppState>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(target: "itinerary::server", error = %rejection.body_text(), "unreadable trip request");
        ApiError::BadRequest
    })?;

    let itinerary = state
        .pipeline
        .generate_itinerary(request)
        .await
        .map_err(|err| {
            if !err.is_client_error() {
                error!(
                    target: "itinerary::server",
                    code = err.error_code(),
                    error = %err,
                    "travel plan generation failed"
                );
            }
            ApiError::from(err)
        })?;

    Ok(Json(PlanResponse {
        message: GENERATION_SUCCEEDED_MESSAGE,
        data: itinerary,
    }))
}

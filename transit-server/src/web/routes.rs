//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::network::{BUS_STOP_SAMPLE, stop_listing};
use crate::planner::PlanError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/network/stops", get(stops))
        .route("/api/v1/routes/search", post(search_routes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        graph_nodes: state.engine.network().graph.node_count(),
        estimator_ready: state.engine.estimator().is_ready(),
    })
}

/// Stops for the map: every metro station and a sample of bus stops.
async fn stops(State(state): State<AppState>) -> Json<StopsResponse> {
    let stops = stop_listing(&state.engine.network().graph, BUS_STOP_SAMPLE)
        .into_iter()
        .map(|n| n.as_ref().clone())
        .collect();
    Json(StopsResponse { stops })
}

/// Plan ranked routes between two points.
async fn search_routes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RouteSearchResponse>, AppError> {
    // Parse JSON manually so malformed bodies get a JSON error
    let req: RouteSearchRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(&body), "rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;
    let query = req
        .to_query()
        .map_err(|message| AppError::BadRequest { message })?;

    // Planning is CPU-bound; keep it off the async workers
    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || engine.plan(&query))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("planner task failed: {e}"),
        })??;

    debug!(
        outcome = ?result.outcome,
        routes = result.routes.len(),
        truncated = result.truncated,
        "planned routes"
    );

    Ok(Json(RouteSearchResponse {
        routes: result.routes.iter().map(RouteResult::from_ranked).collect(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::NotInitialized | PlanError::EstimatorUnavailable(_) => {
                AppError::Unavailable {
                    message: e.to_string(),
                }
            }
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "bad request");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

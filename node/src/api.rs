//! # REST API
//!
//! Builds the axum router that exposes the farm service over HTTP. The
//! routes are a thin 1:1 binding of the core operations: all invariants
//! live in `farm-registry`, all status-code mapping lives here.
//!
//! ## Endpoints
//!
//! | Method | Path                      | Description                          |
//! |--------|---------------------------|--------------------------------------|
//! | GET    | `/health`                 | Liveness probe                       |
//! | GET    | `/api/farms`              | All farms in registration order      |
//! | POST   | `/api/farms`              | Register a farm, compute its ceiling |
//! | POST   | `/api/farms/:id/tokenise` | Create the farm's token on-ledger    |
//!
//! Anything else gets the JSON 404 fallback.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use farm_registry::config::SERVICE_NAME;
use farm_registry::coordinator::TokenisationCoordinator;
use farm_registry::error::RegistryError;
use farm_registry::farm::{FarmApplication, FarmRecord};
use farm_registry::registry::SharedRegistry;

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone — everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The node's reported version string.
    pub version: String,
    /// Target ledger network designation.
    pub network: String,
    /// Authoritative farm store, shared with the coordinator.
    pub registry: SharedRegistry,
    /// Orchestrates the ledger-side tokenisation.
    pub coordinator: Arc<TokenisationCoordinator>,
    /// Prometheus handles for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
///
/// `cors_origin` is either `"*"` (any origin) or a single allowed origin.
/// An unparseable origin falls back to any, loudly.
pub fn create_router(state: AppState, cors_origin: &str) -> Router {
    let cors = match cors_origin {
        "*" => CorsLayer::new().allow_origin(Any),
        origin => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new().allow_origin(value),
            Err(_) => {
                tracing::warn!(origin, "unparseable CORS origin, allowing any");
                CorsLayer::new().allow_origin(Any)
            }
        },
    }
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/farms", get(list_farms_handler).post(register_farm_handler))
        .route("/api/farms/:id/tokenise", post(tokenise_farm_handler))
        .fallback(fallback_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Response payload for `GET /api/farms`.
#[derive(Debug, Serialize, Deserialize)]
pub struct FarmsResponse {
    pub farms: Vec<FarmRecord>,
}

/// Response payload for `POST /api/farms`.
#[derive(Debug, Serialize, Deserialize)]
pub struct FarmResponse {
    pub farm: FarmRecord,
}

/// Response payload for `POST /api/farms/:id/tokenise`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokeniseResponse {
    pub farm: FarmRecord,
    pub token_id: String,
}

/// Error body returned by all endpoints on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong.
    pub error: String,
    /// Machine-readable error kind (validation, not_found, tokenisation).
    pub kind: String,
    /// Underlying cause, when there is one worth surfacing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Maps a domain error to its HTTP status and JSON body.
fn error_response(err: RegistryError) -> Response {
    let status = match &err {
        RegistryError::Validation(_) => StatusCode::BAD_REQUEST,
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::Tokenisation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = match &err {
        RegistryError::Tokenisation { source, .. } => ErrorResponse {
            error: err.to_string(),
            kind: err.kind().into(),
            detail: Some(source.to_string()),
        },
        other => ErrorResponse {
            error: other.to_string(),
            kind: other.kind().into(),
            detail: None,
        },
    };
    (status, Json(body)).into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — liveness probe.
///
/// Static payload, no domain logic. Orchestrators poke this; everything
/// interesting is on `/metrics`.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": state.version,
        "network": state.network,
    }))
}

/// `GET /api/farms` — all farms in registration order.
async fn list_farms_handler(State(state): State<AppState>) -> impl IntoResponse {
    let farms = state.registry.read().list().to_vec();
    Json(FarmsResponse { farms })
}

/// `POST /api/farms` — registers a farm and computes its tokenisation
/// ceiling. 201 on success, 400 on invalid input.
async fn register_farm_handler(
    State(state): State<AppState>,
    Json(application): Json<FarmApplication>,
) -> Response {
    let result = state.registry.write().register(application);
    match result {
        Ok(farm) => {
            state.metrics.farms_registered_total.inc();
            state
                .metrics
                .registered_farms
                .set(state.registry.read().len() as i64);
            (StatusCode::CREATED, Json(FarmResponse { farm })).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// `POST /api/farms/:id/tokenise` — drives the registered→tokenised
/// transition. 200 on success (including the idempotent already-tokenised
/// case), 404 for an unknown farm, 500 when the ledger gateway fails.
async fn tokenise_farm_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let started = Instant::now();
    match state.coordinator.tokenise(&id).await {
        Ok(outcome) => {
            if outcome.freshly_issued {
                state.metrics.tokenisations_total.inc();
                state
                    .metrics
                    .gateway_latency_seconds
                    .observe(started.elapsed().as_secs_f64());
            }
            (
                StatusCode::OK,
                Json(TokeniseResponse {
                    farm: outcome.farm,
                    token_id: outcome.token_id,
                }),
            )
                .into_response()
        }
        Err(err) => {
            if matches!(err, RegistryError::Tokenisation { .. }) {
                state.metrics.tokenisation_failures_total.inc();
            }
            error_response(err)
        }
    }
}

/// JSON 404 for any route the router does not know.
async fn fallback_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".into(),
            kind: "not_found".into(),
            detail: None,
        }),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

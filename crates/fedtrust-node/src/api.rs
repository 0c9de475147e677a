//! HTTP API server for the fedtrust node.
//!
//! Read endpoints for stored entries plus an on-demand platform reputation
//! recomputation, replacing the original request/reply lookup channel.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use fedtrust_core::{EntryKey, TrustEntry};
use fedtrust_scoring::TrustCalculator;
use fedtrust_store::TrustStore;

/// Shared state accessible from HTTP handlers.
pub struct ApiState {
    pub platform_id: String,
    pub store: Arc<dyn TrustStore>,
    pub calculator: Arc<TrustCalculator>,
    pub start_time: Instant,
}

// --- Response types ---

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub platform_id: String,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct ReputationResponse {
    pub platform_id: String,
    pub value: Option<f64>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(e: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "entry not found".into(),
        }),
    )
}

// --- Handlers ---

async fn handle_status(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        platform_id: state.platform_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_resource_trust(
    State(state): State<Arc<ApiState>>,
    Path(resource_id): Path<String>,
) -> Result<Json<TrustEntry>, ApiError> {
    let entry = state
        .store
        .find_resource_trust(&resource_id)
        .await
        .map_err(internal_error)?;
    entry.map(Json).ok_or_else(not_found)
}

async fn handle_platform_reputation(
    State(state): State<Arc<ApiState>>,
    Path(platform_id): Path<String>,
) -> Result<Json<TrustEntry>, ApiError> {
    let entry = state
        .store
        .get(&EntryKey::platform_reputation(&platform_id))
        .await
        .map_err(internal_error)?;
    entry.map(Json).ok_or_else(not_found)
}

async fn handle_adaptive_trust(
    State(state): State<Arc<ApiState>>,
    Path((platform_id, resource_id)): Path<(String, String)>,
) -> Result<Json<TrustEntry>, ApiError> {
    let key = EntryKey::adaptive_resource_trust(Some(&platform_id), &resource_id);
    let entry = state.store.get(&key).await.map_err(internal_error)?;
    entry.map(Json).ok_or_else(not_found)
}

/// Compute the platform's reputation now, persist it, and return the value.
async fn handle_recompute_reputation(
    State(state): State<Arc<ApiState>>,
    Path(platform_id): Path<String>,
) -> Result<Json<ReputationResponse>, ApiError> {
    let value = state.calculator.platform_reputation(&platform_id).await;

    let key = EntryKey::platform_reputation(&platform_id);
    let entry = match state.store.get(&key).await.map_err(internal_error)? {
        Some(existing) => existing.with_value(value),
        None => TrustEntry::placeholder(key).with_value(value),
    };
    state.store.save(&entry).await.map_err(internal_error)?;

    Ok(Json(ReputationResponse {
        platform_id,
        value: entry.value,
    }))
}

/// Build the API router.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/v1/status", get(handle_status))
        .route(
            "/api/v1/trust/resource/{resource_id}",
            get(handle_resource_trust),
        )
        .route(
            "/api/v1/trust/platform/{platform_id}",
            get(handle_platform_reputation),
        )
        .route(
            "/api/v1/trust/adaptive/{platform_id}/{resource_id}",
            get(handle_adaptive_trust),
        )
        .route(
            "/api/v1/trust/platform/{platform_id}/recompute",
            post(handle_recompute_reputation),
        )
        .with_state(state)
}

/// Start the API server, serving until the process exits.
pub async fn start_api_server(addr: SocketAddr, state: Arc<ApiState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

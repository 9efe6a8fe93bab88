//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// Upper bound on names per batch request.
const MAX_BATCH_NAMES: usize = 50;

/// GET /api/v1/profile/:name
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let profile = state.resolver.resolve(&name, state.credential()).await?;

    Ok(Json(ProfileResponse {
        profile,
        resolved_at: Utc::now(),
    }))
}

/// POST /api/v1/profiles
pub async fn resolve_profiles(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResponse>> {
    let names = req.names.into_names();

    if names.is_empty() {
        return Err(ApiError::bad_request("At least one name is required"));
    }
    if names.len() > MAX_BATCH_NAMES {
        return Err(ApiError::bad_request(format!(
            "Too many names: {} (max {})",
            names.len(),
            MAX_BATCH_NAMES
        )));
    }

    let batch = state.resolver.resolve_batch(&names, state.credential()).await;

    info!(
        resolved = batch.resolved.len(),
        failed = batch.failed.len(),
        "Batch lookup served"
    );

    Ok(Json(BatchResponse {
        total: batch.len(),
        batch,
        resolved_at: Utc::now(),
    }))
}

/// GET /health
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        enrichment_enabled: state.credential().is_some(),
    })
}

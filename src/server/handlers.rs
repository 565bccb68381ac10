//! HTTP request handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::schema::FeatureVector;

use super::error::{Result, ServerError};
use super::state::AppState;

/// Prediction endpoint response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: i64,
}

/// Liveness probe: succeeds whenever the process is reachable, independent
/// of storage or model state.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// Storage readiness probe: one trivial round trip, no log entry written.
pub async fn db_check(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>> {
    state
        .store
        .check_connectivity()
        .await
        .map_err(|e| ServerError::Unavailable(format!("Database connection error: {}", e)))?;

    Ok(Json(json!({
        "status": "ok",
        "message": "Database connection is healthy.",
    })))
}

/// Core endpoint: validate, score, persist, respond, strictly in that
/// order. The response is not sent until the log row is committed.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<PredictResponse>> {
    // Session scoped to this request; dropped (released) on every exit.
    let mut session = state
        .store
        .session()
        .await
        .map_err(|e| ServerError::Storage(e.to_string()))?;

    let vector = FeatureVector::from_json(&body)?;

    let prediction = state
        .adapter
        .predict(&vector)
        .map_err(|e| ServerError::Model(e.to_string()))?;

    let entry = state
        .store
        .append(&mut session, &vector, prediction)
        .await
        .map_err(|e| ServerError::Storage(e.to_string()))?;

    info!(entry_id = entry.id, prediction, "Prediction served");
    Ok(Json(PredictResponse { prediction }))
}

//! Diagnostic probes of backend reachability and model availability.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use mapsmith::ProbeReport;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ollama_available: bool,
    pub model_loaded: bool,
    pub timestamp: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let available = state.client.model_available().await.unwrap_or(false);
    Json(HealthResponse {
        status: if available { "healthy" } else { "degraded" },
        ollama_available: available,
        model_loaded: available,
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn test_ollama(State(state): State<AppState>) -> Json<ProbeReport> {
    Json(state.client.probe().await)
}

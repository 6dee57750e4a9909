use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub sessions: SessionInfo,
    pub poll_interval_secs: u64,
}

#[derive(Serialize)]
pub struct SessionInfo {
    pub active: usize,
    pub max: usize,
}

/// Returns server status and session counts as JSON.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (active, max) = {
        let sessions = state.sessions.read().await;
        (sessions.len(), sessions.max_sessions())
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        sessions: SessionInfo { active, max },
        poll_interval_secs: state.config.report.poll_interval_secs,
    })
}

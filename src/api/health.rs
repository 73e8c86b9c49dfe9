//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub templates: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres: Option<PostgresHealthResponse>,
}

#[derive(Debug, Serialize)]
pub struct PostgresHealthResponse {
    pub pool_size: u32,
    pub idle_connections: u32,
}

/// GET /health - Liveness plus a few cheap facts about the process
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let postgres = state.postgres_pool.as_ref().map(|pool| {
        let inner = pool.pool();
        PostgresHealthResponse {
            pool_size: inner.size(),
            idle_connections: inner.num_idle() as u32,
        }
    });

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        templates: state.templates.count(),
        postgres,
    })
}

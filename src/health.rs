use crate::routes::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub api_base_url: String,
    pub default_locale: String,
    pub open_views: usize,
}

/// Liveness probe response (minimal, just indicates the process is running)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/_/health", get(health_check))
        .route("/_/healthz", get(health_check)) // Kubernetes convention
        .route("/_/livez", get(liveness_check)) // Kubernetes liveness probe
}

/// Main health check endpoint. Reports configuration only; GitHub itself is
/// not probed so health checks never spend the unauthenticated rate limit.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        api_base_url: state.github.base_url().to_string(),
        default_locale: state.default_locale.code().to_string(),
        open_views: state.sessions.len().await,
    };

    (StatusCode::OK, Json(response))
}

/// Kubernetes liveness probe - just checks if the process is alive
async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: "alive".to_string(),
        }),
    )
}

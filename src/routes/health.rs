/**
 * Health Routes
 * Liveness ping and a detailed view with uptime and record counts
 */
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::state::AppState;
use crate::store::CollectionCounts;

// Track server start time for uptime calculation
lazy_static::lazy_static! {
    static ref SERVER_START: Instant = Instant::now();
}

/// Initialize the server start time
pub fn init_start_time() {
    lazy_static::initialize(&SERVER_START);
}

/// Simple health response
#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleHealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since startup
    pub uptime: u64,
    pub counts: CollectionCounts,
}

/// GET /health
pub async fn health_ping() -> Json<SimpleHealthResponse> {
    Json(SimpleHealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let counts = state.store.read().await.counts();

    Json(DetailedHealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        uptime: SERVER_START.elapsed().as_secs(),
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{send, test_app};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_health_ping_returns_ok() {
        init_start_time();
        let (app, _dir) = test_app(false);
        let (status, body) = send(app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_health_detailed_reports_counts() {
        init_start_time();
        let (app, _dir) = test_app(true);
        let (status, body) = send(app, Method::GET, "/health/detailed", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["uptime"].is_u64());
        assert_eq!(body["counts"]["blogPosts"], 3);
        assert_eq!(body["counts"]["metaTags"], 7);
    }
}

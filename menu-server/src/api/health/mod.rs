//! Health and status routes
//!
//! | Path | Description |
//! |------|-------------|
//! | /health | Liveness plus version and uptime |
//! | /live | Process is up |
//! | /ready | Database reachable (503 otherwise) |
//! | /status, /api/v1/status | Pool stats and API info |
//!
//! These answer with plain JSON rather than the envelope so load balancers
//! can read them directly.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use http::StatusCode;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::api::API_PREFIX;
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SERVICE_NAME: &str = "restaurant-menu-api";
const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Root-level routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/live", get(live))
        .route("/ready", get(ready))
        .route("/status", get(status))
}

/// Routes nested under the API prefix
pub fn api_router() -> Router<AppState> {
    Router::new().route("/status", get(status))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
    version: &'static str,
    /// Seconds since start
    uptime: u64,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    status: &'static str,
    timestamp: String,
    checks: ReadyChecks,
}

#[derive(Serialize)]
pub struct ReadyChecks {
    database: CheckResult,
}

/// Single dependency check
#[derive(Serialize)]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    fn ok(latency_ms: u64) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
    timestamp: String,
    uptime: u64,
    database: PoolStats,
    api: ApiInfo,
}

#[derive(Serialize)]
pub struct PoolStats {
    size: u32,
    idle: usize,
    in_use: usize,
    max_connections: u32,
}

#[derive(Serialize)]
pub struct ApiInfo {
    name: &'static str,
    version: &'static str,
    prefix: &'static str,
    environment: String,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: shared::util::now_rfc3339(),
        version: VERSION,
        uptime: state.uptime().as_secs(),
    })
}

/// GET /live
async fn live() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "timestamp": shared::util::now_rfc3339(),
    }))
}

async fn check_database(state: &AppState) -> CheckResult {
    let start = Instant::now();
    let ping = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.pool);
    match tokio::time::timeout(DB_CHECK_TIMEOUT, ping).await {
        Ok(Ok(_)) => CheckResult::ok(start.elapsed().as_millis() as u64),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Readiness check: database unreachable");
            CheckResult::error(e.to_string())
        }
        Err(_) => {
            tracing::warn!("Readiness check: database ping timed out");
            CheckResult::error("timeout")
        }
    }
}

/// GET /ready
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let database = check_database(&state).await;
    let (code, status) = if database.is_ok() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    };
    (
        code,
        Json(ReadyResponse {
            status,
            timestamp: shared::util::now_rfc3339(),
            checks: ReadyChecks { database },
        }),
    )
}

/// GET /status
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let size = state.pool.size();
    let idle = state.pool.num_idle();
    Json(StatusResponse {
        status: "operational",
        timestamp: shared::util::now_rfc3339(),
        uptime: state.uptime().as_secs(),
        database: PoolStats {
            size,
            idle,
            in_use: (size as usize).saturating_sub(idle),
            max_connections: state.config.db_max_connections,
        },
        api: ApiInfo {
            name: SERVICE_NAME,
            version: VERSION,
            prefix: API_PREFIX,
            environment: state.config.environment.clone(),
        },
    })
}

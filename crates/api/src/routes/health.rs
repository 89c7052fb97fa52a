//! Liveness check for load balancers, served outside `/api` and without
//! authentication.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    /// Running, but the database did not answer.
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthReport {
    fn from_check(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy {
                ServiceStatus::Ok
            } else {
                ServiceStatus::Degraded
            },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

/// GET /health
async fn report(State(state): State<AppState>) -> Json<HealthReport> {
    let check = erp_db::health_check(&state.pool).await;
    if let Err(err) = &check {
        tracing::warn!(error = %err, "Health check could not reach the database");
    }
    Json(HealthReport::from_check(check.is_ok()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report))
}

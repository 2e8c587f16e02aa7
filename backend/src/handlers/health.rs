//! Service health endpoint
//!
//! Reports whether the plan generation engine can reach its database and
//! which environment the server runs as. Deployment probes poll this.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Whether a generation request would be able to touch storage right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageStatus {
    Available,
    Unavailable,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub database: StorageStatus,
}

/// Probe the database with a trivial query and report engine readiness.
/// The endpoint itself always answers 200; probes inspect the body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => StorageStatus::Available,
        Err(_) => StorageStatus::Unavailable,
    };

    Json(HealthResponse {
        status: match database {
            StorageStatus::Available => "ready",
            StorageStatus::Unavailable => "degraded",
        },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database,
    })
}

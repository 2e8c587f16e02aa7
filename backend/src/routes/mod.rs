//! Route definitions for the NutriPlan Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Weekly plan generation and queries
        .nest("/plans", plan_routes())
        // Per-subscriber plan listing
        .nest("/users", user_routes())
}

/// Weekly plan routes
fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(handlers::generate_plan))
        .route(
            "/:plan_id",
            get(handlers::get_plan).delete(handlers::delete_plan),
        )
}

/// Subscriber-scoped routes
fn user_routes() -> Router<AppState> {
    Router::new().route("/:user_id/plans", get(handlers::list_plans))
}

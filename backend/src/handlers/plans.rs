//! HTTP handlers for weekly plan endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::plan_generation::{
    GenerateWeeklyPlanInput, GeneratedWeeklyPlan, PlanGenerationService,
};
use crate::services::plans::{PlanService, WeeklyPlanDetail};
use crate::AppState;
use shared::WeeklyPlan;

/// Subscriber scoping for plan reads; role checks happen upstream
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Uuid,
}

/// Generate (or regenerate) the weekly plan for one subscriber and week
pub async fn generate_plan(
    State(state): State<AppState>,
    Json(input): Json<GenerateWeeklyPlanInput>,
) -> AppResult<Json<GeneratedWeeklyPlan>> {
    let service = PlanGenerationService::new(state.db);
    let generated = service.generate_weekly_plan(input).await?;
    Ok(Json(generated))
}

/// Get one plan with its meals and ingredient requirements
pub async fn get_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<Json<WeeklyPlanDetail>> {
    let service = PlanService::new(state.db);
    let detail = service.get_plan(owner.user_id, plan_id).await?;
    Ok(Json(detail))
}

/// List a subscriber's plans, newest week first
pub async fn list_plans(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<WeeklyPlan>>> {
    let service = PlanService::new(state.db);
    let plans = service.list_plans(user_id).await?;
    Ok(Json(plans))
}

/// Delete a subscriber's plan
pub async fn delete_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let service = PlanService::new(state.db);
    service.delete_plan(owner.user_id, plan_id).await?;
    Ok(Json(serde_json::json!({ "deleted": plan_id })))
}

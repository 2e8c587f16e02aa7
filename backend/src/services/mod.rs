//! Business logic services for the NutriPlan Platform

pub mod plan_generation;
pub mod plans;

pub use plan_generation::PlanGenerationService;
pub use plans::PlanService;

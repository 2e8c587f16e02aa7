//! HTTP handlers for the NutriPlan Platform

pub mod health;
pub mod plans;

pub use health::health_check;
pub use plans::{delete_plan, generate_plan, get_plan, list_plans};

//! Shared types and domain logic for the NutriPlan Platform
//!
//! This crate contains the data model and the pure, I/O-free pieces of the
//! weekly plan generation engine: the business-day calendar, the calorie and
//! macro distribution resolver, the meal scaling engine and the weekly plan
//! assembler. The backend orchestrates persistence around these functions.

pub mod calendar;
pub mod distribution;
pub mod models;
pub mod planner;
pub mod scaling;
pub mod types;
pub mod validation;

pub use calendar::*;
pub use distribution::*;
pub use models::*;
pub use planner::*;
pub use scaling::*;
pub use types::*;
pub use validation::*;

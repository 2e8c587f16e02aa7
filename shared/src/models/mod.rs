//! Domain models for the NutriPlan Platform

mod plan;
mod profile;
mod template;

pub use plan::*;
pub use profile::*;
pub use template::*;

//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the prediction workflow.

mod model_store;
mod prediction;

pub use model_store::ModelStore;
pub use prediction::PredictionService;

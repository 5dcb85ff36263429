//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external formats:
//! - `artifact`: JSON model artifacts and their integrity manifest
//! - `sanitize`: clinical value filtering for logs

pub mod artifact;
pub mod sanitize;

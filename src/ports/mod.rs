//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (model artifacts).

mod classifier;

pub use classifier::{Classifier, ModelError};

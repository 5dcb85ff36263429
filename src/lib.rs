//! # Medipredict
//!
//! Multiple disease prediction from clinical measurements.
//!
//! This crate provides:
//! - Static input schemas for kidney, liver and Parkinson's disease
//! - Loading of pre-trained binary classifiers exported as JSON
//! - Risk tiering of the positive-class probability
//! - Terminal UI to fill in a form and read the result
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (Disease profiles, Feature vectors, Risk levels)
//! - `ports`: Trait definitions for external operations (Classifier)
//! - `adapters`: Concrete implementations (JSON artifacts, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Disease, PredictionReport, PredictionResult, RiskLevel};

/// Result type for Medipredict operations
pub type Result<T> = std::result::Result<T, MedipredictError>;

/// Main error type for Medipredict
#[derive(Debug, thiserror::Error)]
pub enum MedipredictError {
    #[error("Model error: {0}")]
    Model(#[from] ports::ModelError),

    #[error("Invalid form input: {0}")]
    Form(#[from] domain::FormError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

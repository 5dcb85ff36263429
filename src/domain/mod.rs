//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O: disease schemas, feature vector assembly,
//! and prediction interpretation.

mod disease;
mod prediction;
mod profile;

pub use disease::{Disease, KIDNEY, LIVER, PARKINSONS};
pub use prediction::{
    format_percentage, PredictionReport, PredictionResult, RiskLevel, HIGH_RISK_THRESHOLD,
    MODERATE_RISK_THRESHOLD,
};
pub use profile::{DiseaseProfile, FeatureVector, FieldKind, FieldSpec, FieldValue, FormError};

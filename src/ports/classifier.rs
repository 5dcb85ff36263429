//! Classifier port: Trait for pre-trained binary classifiers.
//!
//! This trait abstracts the model artifact format from the application logic,
//! so the prediction workflow can run against a stub in tests.

/// Errors that can occur while loading or running a classifier.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model artifact {path}: {message}")]
    InvalidArtifact { path: String, message: String },

    #[error("Integrity check failed for {file}: {message}")]
    Integrity { file: String, message: String },

    #[error("Feature count mismatch: got {got}, expected {expected}")]
    FeatureCount { expected: usize, got: usize },

    #[error("Model produced an invalid label: {0}")]
    InvalidLabel(u8),

    #[error("Model produced an invalid probability: {0}")]
    InvalidProbability(f64),
}

/// Trait for binary classification.
///
/// Implementations are immutable after construction and shared read-only
/// for the process lifetime.
pub trait Classifier: Send + Sync {
    /// Number of features the classifier expects, in training order.
    fn n_features(&self) -> usize;

    /// Predict the class label (0 or 1).
    ///
    /// # Errors
    /// Returns `ModelError::FeatureCount` if the vector has the wrong length.
    fn predict(&self, features: &[f64]) -> Result<u8, ModelError>;

    /// Probability of the positive class, in [0, 1].
    ///
    /// # Errors
    /// Returns `ModelError::FeatureCount` if the vector has the wrong length.
    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn n_features(&self) -> usize {
        (**self).n_features()
    }

    fn predict(&self, features: &[f64]) -> Result<u8, ModelError> {
        (**self).predict(features)
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        (**self).predict_probability(features)
    }
}

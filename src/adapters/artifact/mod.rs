//! JSON model artifacts: Implementation of `Classifier` for exported models.
//!
//! Models are trained offline and exported as JSON documents tagged by
//! `kind`:
//!
//! - `logistic`: linear model with optional standard scaler,
//!   `p = sigmoid(intercept + Σ coef_i * (x_i - mean_i) / scale_i)`
//! - `gradient_boosted`: additive tree ensemble,
//!   `p = sigmoid(base_score + Σ tree_k(x))`
//!
//! Every artifact is validated on load so that inference can index freely.
//! An optional `manifest.json` binds the artifact bytes to SHA-256 digests
//! (see [`manifest`]).

pub mod manifest;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DiseaseProfile;
use crate::ports::{Classifier, ModelError};

pub use manifest::{sha256_hex, ArtifactManifest};

fn default_threshold() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Logistic regression parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scaler_scale: Option<Vec<f64>>,
    /// Class 1 is predicted when the probability is strictly above this.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// One node of a regression tree, stored in a flat array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        /// Branch taken when the feature value is NaN.
        #[serde(default = "default_true")]
        default_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

/// Regression tree; node 0 is the root and children always follow parents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = features[*feature];
                    index = if x.is_nan() {
                        if *default_left {
                            *left
                        } else {
                            *right
                        }
                    } else if x < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Gradient-boosted tree ensemble for binary classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostedTreesModel {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub n_features: usize,
    /// Initial margin (log-odds) added to the tree outputs.
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// A deserialized, validated model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
    GradientBoosted(BoostedTreesModel),
}

impl ModelArtifact {
    /// Read, parse and validate an artifact file.
    ///
    /// # Errors
    /// Returns error if the file is unreadable, not valid JSON, or fails
    /// structural validation.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact = Self::from_json(&content, &path.display().to_string())?;

        tracing::info!(
            "Loaded {} model from {:?} (n_features={})",
            artifact.kind(),
            path,
            artifact.n_features()
        );
        Ok(artifact)
    }

    /// Parse and validate an artifact from a JSON string.
    ///
    /// `origin` names the source in error messages.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` if parsing or validation fails.
    pub fn from_json(content: &str, origin: &str) -> Result<Self, ModelError> {
        let artifact: Self =
            serde_json::from_str(content).map_err(|e| ModelError::InvalidArtifact {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        artifact.validate().map_err(|message| ModelError::InvalidArtifact {
            path: origin.to_string(),
            message,
        })?;
        Ok(artifact)
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logistic(_) => "logistic",
            Self::GradientBoosted(_) => "gradient_boosted",
        }
    }

    /// Feature names recorded at export time (may be empty).
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        match self {
            Self::Logistic(m) => &m.feature_names,
            Self::GradientBoosted(m) => &m.feature_names,
        }
    }

    fn threshold(&self) -> f64 {
        match self {
            Self::Logistic(m) => m.threshold,
            Self::GradientBoosted(m) => m.threshold,
        }
    }

    /// Check that this artifact was exported for the given profile.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` on a feature count or name/order
    /// mismatch.
    pub fn check_schema(&self, profile: &DiseaseProfile, origin: &str) -> Result<(), ModelError> {
        if self.n_features() != profile.field_count() {
            return Err(ModelError::InvalidArtifact {
                path: origin.to_string(),
                message: format!(
                    "model expects {} features but {} declares {}",
                    self.n_features(),
                    profile.name(),
                    profile.field_count()
                ),
            });
        }

        let names = self.feature_names();
        if !names.is_empty() {
            if let Some((i, (expected, got))) = profile
                .keys()
                .zip(names)
                .enumerate()
                .find(|(_, (expected, got))| *expected != got.as_str())
            {
                return Err(ModelError::InvalidArtifact {
                    path: origin.to_string(),
                    message: format!(
                        "feature {i} is {got:?} in the model but {expected:?} in the {} schema",
                        profile.name()
                    ),
                });
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), String> {
        let threshold = self.threshold();
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(format!("threshold {threshold} must be in (0, 1)"));
        }

        let n = self.n_features();
        if n == 0 {
            return Err("model has no features".into());
        }
        let names = self.feature_names();
        if !names.is_empty() && names.len() != n {
            return Err(format!(
                "feature_names has {} entries, expected {n}",
                names.len()
            ));
        }

        match self {
            Self::Logistic(m) => {
                if !m.intercept.is_finite() || m.coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("coefficients must be finite".into());
                }
                match (&m.scaler_mean, &m.scaler_scale) {
                    (None, None) => {}
                    (Some(mean), Some(scale)) => {
                        if mean.len() != n || scale.len() != n {
                            return Err(
                                "scaler parameter lengths do not match coefficients length".into(),
                            );
                        }
                        if mean.iter().any(|v| !v.is_finite())
                            || scale.iter().any(|v| !v.is_finite() || *v == 0.0)
                        {
                            return Err("scaler parameters must be finite and scale non-zero".into());
                        }
                    }
                    _ => return Err("scaler_mean and scaler_scale must be given together".into()),
                }
            }
            Self::GradientBoosted(m) => {
                if !m.base_score.is_finite() {
                    return Err("base_score must be finite".into());
                }
                for (t, tree) in m.trees.iter().enumerate() {
                    if tree.nodes.is_empty() {
                        return Err(format!("tree {t} has no nodes"));
                    }
                    for (i, node) in tree.nodes.iter().enumerate() {
                        match node {
                            TreeNode::Split {
                                feature,
                                threshold,
                                left,
                                right,
                                ..
                            } => {
                                if *feature >= n {
                                    return Err(format!(
                                        "tree {t} node {i} splits on feature {feature}, model has {n}"
                                    ));
                                }
                                if !threshold.is_finite() {
                                    return Err(format!("tree {t} node {i} has a non-finite threshold"));
                                }
                                let len = tree.nodes.len();
                                if *left <= i || *right <= i || *left >= len || *right >= len {
                                    return Err(format!(
                                        "tree {t} node {i} has invalid children ({left}, {right})"
                                    ));
                                }
                            }
                            TreeNode::Leaf { leaf } => {
                                if !leaf.is_finite() {
                                    return Err(format!("tree {t} node {i} has a non-finite leaf"));
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_len(&self, features: &[f64]) -> Result<(), ModelError> {
        if features.len() != self.n_features() {
            return Err(ModelError::FeatureCount {
                expected: self.n_features(),
                got: features.len(),
            });
        }
        Ok(())
    }

    fn margin(&self, features: &[f64]) -> f64 {
        match self {
            Self::Logistic(m) => {
                let dot: f64 = match (&m.scaler_mean, &m.scaler_scale) {
                    (Some(mean), Some(scale)) => features
                        .iter()
                        .zip(mean.iter().zip(scale))
                        .zip(&m.coefficients)
                        .map(|((x, (mu, s)), w)| w * (x - mu) / s)
                        .sum(),
                    _ => features.iter().zip(&m.coefficients).map(|(x, w)| w * x).sum(),
                };
                m.intercept + dot
            }
            Self::GradientBoosted(m) => {
                m.base_score + m.trees.iter().map(|t| t.evaluate(features)).sum::<f64>()
            }
        }
    }
}

impl Classifier for ModelArtifact {
    fn n_features(&self) -> usize {
        match self {
            Self::Logistic(m) => m.coefficients.len(),
            Self::GradientBoosted(m) => m.n_features,
        }
    }

    fn predict(&self, features: &[f64]) -> Result<u8, ModelError> {
        let p = self.predict_probability(features)?;
        Ok(u8::from(p > self.threshold()))
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.check_len(features)?;
        let p = sigmoid(self.margin(features));
        if !(0.0..=1.0).contains(&p) {
            return Err(ModelError::InvalidProbability(p));
        }
        Ok(p)
    }
}

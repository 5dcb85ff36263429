//! Prediction service: form values in, renderable report out.
//!
//! This service coordinates:
//! - Feature vector assembly from the disease profile
//! - Label and probability scoring on the disease's classifier
//! - Risk tier interpretation

use std::sync::Arc;

use crate::domain::{Disease, FeatureVector, FieldValue, PredictionReport, PredictionResult};
use crate::ports::{Classifier, ModelError};
use crate::MedipredictError;

/// Service for running disease predictions against a loaded model store.
pub struct PredictionService<C: Classifier> {
    store: Arc<super::ModelStore<C>>,
}

impl<C: Classifier> PredictionService<C> {
    pub fn new(store: Arc<super::ModelStore<C>>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &super::ModelStore<C> {
        &self.store
    }

    /// Assemble the feature vector for `disease` and score it.
    ///
    /// # Errors
    /// Returns error if the values do not fit the disease profile or the
    /// classifier fails.
    pub fn predict(
        &self,
        disease: Disease,
        values: &[FieldValue],
    ) -> Result<PredictionReport, MedipredictError> {
        let vector = disease.profile().assemble(values)?;
        self.predict_vector(&vector)
    }

    /// Score an already assembled feature vector.
    ///
    /// # Errors
    /// Returns error if the classifier rejects the vector or returns an
    /// out-of-range label or probability.
    pub fn predict_vector(
        &self,
        vector: &FeatureVector,
    ) -> Result<PredictionReport, MedipredictError> {
        let disease = vector.disease();
        let model = self.store.classifier(disease);

        tracing::debug!("Scoring {} features for {}", vector.len(), disease);

        let label = model.predict(vector.as_slice())?;
        if label > 1 {
            return Err(ModelError::InvalidLabel(label).into());
        }
        let probability = model.predict_probability(vector.as_slice())?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::InvalidProbability(probability).into());
        }

        let result = PredictionResult::new(label, probability);
        tracing::info!(
            "Prediction complete for {}: label={}, probability={:.4}, risk={:?}",
            disease,
            result.label,
            result.probability,
            result.risk_level
        );

        Ok(PredictionReport::new(disease, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ModelStore;
    use crate::domain::RiskLevel;

    /// Returns a fixed probability and records nothing.
    struct StubClassifier {
        n_features: usize,
        probability: f64,
        label: u8,
    }

    impl StubClassifier {
        fn new(disease: Disease, probability: f64) -> Self {
            Self {
                n_features: disease.profile().field_count(),
                probability,
                label: u8::from(probability > 0.5),
            }
        }
    }

    impl Classifier for StubClassifier {
        fn n_features(&self) -> usize {
            self.n_features
        }

        fn predict(&self, features: &[f64]) -> Result<u8, ModelError> {
            if features.len() != self.n_features {
                return Err(ModelError::FeatureCount {
                    expected: self.n_features,
                    got: features.len(),
                });
            }
            Ok(self.label)
        }

        fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
            self.predict(features)?;
            Ok(self.probability)
        }
    }

    fn service(kidney: f64, liver: f64, parkinsons: f64) -> PredictionService<StubClassifier> {
        let store = ModelStore::from_classifiers(
            StubClassifier::new(Disease::Kidney, kidney),
            StubClassifier::new(Disease::Liver, liver),
            StubClassifier::new(Disease::Parkinsons, parkinsons),
        )
        .expect("Should build store");
        PredictionService::new(Arc::new(store))
    }

    #[test]
    fn test_predict_routes_to_disease_model() {
        let service = service(0.1, 0.5, 0.9);

        for (disease, label, risk) in [
            (Disease::Kidney, 0, RiskLevel::Low),
            (Disease::Liver, 0, RiskLevel::Moderate),
            (Disease::Parkinsons, 1, RiskLevel::High),
        ] {
            let report = service
                .predict(disease, &disease.profile().defaults())
                .expect("Should predict");
            assert_eq!(report.disease, disease);
            assert_eq!(report.result.label, label);
            assert_eq!(report.result.risk_level, risk);
        }
    }

    #[test]
    fn test_predict_boundary_probabilities() {
        let service = service(0.30, 0.70, 0.2999999);
        let tier = |d: Disease| {
            service
                .predict(d, &d.profile().defaults())
                .expect("Should predict")
                .result
                .risk_level
        };
        assert_eq!(tier(Disease::Kidney), RiskLevel::Moderate);
        assert_eq!(tier(Disease::Liver), RiskLevel::High);
        assert_eq!(tier(Disease::Parkinsons), RiskLevel::Low);
    }

    #[test]
    fn test_predict_rejects_malformed_values() {
        let service = service(0.1, 0.1, 0.1);
        let mut values = Disease::Kidney.profile().defaults();
        values.truncate(10);

        let err = service.predict(Disease::Kidney, &values).unwrap_err();
        assert!(matches!(err, MedipredictError::Form(_)));
    }

    #[test]
    fn test_out_of_range_probability_is_an_error() {
        let service = service(1.5, 0.1, 0.1);
        let err = service
            .predict(Disease::Kidney, &Disease::Kidney.profile().defaults())
            .unwrap_err();
        assert!(matches!(
            err,
            MedipredictError::Model(ModelError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_store_rejects_mismatched_classifier() {
        let result = ModelStore::from_classifiers(
            StubClassifier::new(Disease::Liver, 0.1),
            StubClassifier::new(Disease::Liver, 0.1),
            StubClassifier::new(Disease::Parkinsons, 0.1),
        );
        assert!(matches!(
            result,
            Err(ModelError::FeatureCount {
                expected: 24,
                got: 10
            })
        ));
    }

    #[test]
    fn test_predict_vector_matches_predict() {
        let service = service(0.42, 0.1, 0.1);
        let profile = Disease::Kidney.profile();
        let vector = profile.assemble(&profile.defaults()).expect("assemble");

        let a = service.predict_vector(&vector).expect("Should predict");
        let b = service
            .predict(Disease::Kidney, &profile.defaults())
            .expect("Should predict");
        assert_eq!(a.result, b.result);
        assert_eq!(a.probability_text(), "42.00%");
    }
}

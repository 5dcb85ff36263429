//! Model store: the three disease classifiers, loaded once at startup.

use std::path::Path;

use crate::adapters::artifact::{ArtifactManifest, ModelArtifact};
use crate::domain::Disease;
use crate::ports::{Classifier, ModelError};

/// Read-only holder of one classifier per disease.
///
/// There is no partial mode: a store only exists once all three
/// classifiers are present and match their disease profiles.
pub struct ModelStore<C: Classifier = ModelArtifact> {
    kidney: C,
    liver: C,
    parkinsons: C,
    manifest_verified: bool,
}

impl<C: Classifier> ModelStore<C> {
    /// Assemble a store from already constructed classifiers.
    ///
    /// # Errors
    /// Returns `ModelError::FeatureCount` if a classifier's input width does
    /// not match its disease profile.
    pub fn from_classifiers(kidney: C, liver: C, parkinsons: C) -> Result<Self, ModelError> {
        let store = Self {
            kidney,
            liver,
            parkinsons,
            manifest_verified: false,
        };
        for disease in Disease::ALL {
            let expected = disease.profile().field_count();
            let got = store.classifier(disease).n_features();
            if expected != got {
                return Err(ModelError::FeatureCount { expected, got });
            }
        }
        Ok(store)
    }

    /// Classifier for `disease`.
    #[must_use]
    pub fn classifier(&self, disease: Disease) -> &C {
        match disease {
            Disease::Kidney => &self.kidney,
            Disease::Liver => &self.liver,
            Disease::Parkinsons => &self.parkinsons,
        }
    }

    /// Whether the artifacts were checked against a manifest at load.
    #[must_use]
    pub fn manifest_verified(&self) -> bool {
        self.manifest_verified
    }
}

impl ModelStore<ModelArtifact> {
    /// Load all three artifacts from `model_dir`.
    ///
    /// If `manifest.json` is present every artifact must be listed in it and
    /// match its digest.
    ///
    /// # Errors
    /// Returns error if any artifact is missing, corrupt, fails the manifest
    /// check, or does not match its disease profile.
    pub fn load(model_dir: &Path) -> Result<Self, ModelError> {
        tracing::info!("Loading models from {:?}", model_dir);

        let files: Vec<&str> = Disease::ALL.iter().map(Disease::artifact_file).collect();
        let manifest_verified = match ArtifactManifest::load(model_dir)? {
            Some(manifest) => {
                manifest.verify(model_dir, &files)?;
                tracing::info!("Model manifest verified ({} files)", manifest.files.len());
                true
            }
            None => {
                tracing::warn!(
                    "No {} in {:?}; artifact integrity is not checked",
                    ArtifactManifest::FILE_NAME,
                    model_dir
                );
                false
            }
        };

        let load = |disease: Disease| -> Result<ModelArtifact, ModelError> {
            let path = model_dir.join(disease.artifact_file());
            let artifact = ModelArtifact::load(&path)?;
            artifact.check_schema(disease.profile(), &path.display().to_string())?;
            Ok(artifact)
        };

        let mut store = Self::from_classifiers(
            load(Disease::Kidney)?,
            load(Disease::Liver)?,
            load(Disease::Parkinsons)?,
        )?;
        store.manifest_verified = manifest_verified;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::artifact::LogisticModel;
    use tempfile::tempdir;

    fn write_models(dir: &Path) {
        for disease in Disease::ALL {
            let profile = disease.profile();
            let model = ModelArtifact::Logistic(LogisticModel {
                feature_names: profile.keys().map(String::from).collect(),
                coefficients: vec![0.01; profile.field_count()],
                intercept: -1.0,
                scaler_mean: None,
                scaler_scale: None,
                threshold: 0.5,
            });
            let json = serde_json::to_string_pretty(&model).expect("serialize model");
            std::fs::write(dir.join(disease.artifact_file()), json).expect("write model");
        }
    }

    #[test]
    fn test_load_without_manifest() {
        let dir = tempdir().expect("tempdir");
        write_models(dir.path());

        let store = ModelStore::load(dir.path()).expect("Should load");
        assert!(!store.manifest_verified());
        for disease in Disease::ALL {
            assert_eq!(
                store.classifier(disease).n_features(),
                disease.profile().field_count()
            );
        }
    }

    #[test]
    fn test_load_with_manifest() {
        let dir = tempdir().expect("tempdir");
        write_models(dir.path());
        let files: Vec<&str> = Disease::ALL.iter().map(Disease::artifact_file).collect();
        ArtifactManifest::build(dir.path(), &files)
            .expect("build")
            .write(dir.path())
            .expect("write manifest");

        let store = ModelStore::load(dir.path()).expect("Should load");
        assert!(store.manifest_verified());

        // Any change after the manifest was written is fatal.
        std::fs::write(
            dir.path().join(Disease::Liver.artifact_file()),
            b"{\"kind\": \"logistic\"}",
        )
        .expect("tamper");
        assert!(matches!(
            ModelStore::load(dir.path()),
            Err(ModelError::Integrity { .. })
        ));
    }

    #[test]
    fn test_missing_artifact_is_fatal() {
        let dir = tempdir().expect("tempdir");
        write_models(dir.path());
        std::fs::remove_file(dir.path().join(Disease::Parkinsons.artifact_file()))
            .expect("remove");

        assert!(matches!(
            ModelStore::load(dir.path()),
            Err(ModelError::Io { .. })
        ));
    }

    #[test]
    fn test_corrupt_artifact_is_fatal() {
        let dir = tempdir().expect("tempdir");
        write_models(dir.path());
        std::fs::write(dir.path().join(Disease::Kidney.artifact_file()), b"\x80\x04pickle")
            .expect("write");

        assert!(ModelStore::load(dir.path()).is_err());
    }

    #[test]
    fn test_swapped_artifacts_are_rejected() {
        let dir = tempdir().expect("tempdir");
        write_models(dir.path());
        std::fs::copy(
            dir.path().join(Disease::Kidney.artifact_file()),
            dir.path().join(Disease::Liver.artifact_file()),
        )
        .expect("copy");

        assert!(matches!(
            ModelStore::load(dir.path()),
            Err(ModelError::InvalidArtifact { .. })
        ));
    }

    #[test]
    fn test_shipped_models_load() {
        let store = ModelStore::load(Path::new("models")).expect("Shipped models should load");
        let profile = Disease::Kidney.profile();
        let vector = profile.assemble(&profile.defaults()).expect("assemble");
        let p = store
            .classifier(Disease::Kidney)
            .predict_probability(vector.as_slice())
            .expect("predict");
        assert!((0.0..=1.0).contains(&p));
    }
}

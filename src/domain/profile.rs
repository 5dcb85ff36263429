//! Disease profile schema and feature vector assembly.
//!
//! A [`DiseaseProfile`] is the single source of truth for a disease's input
//! fields: the form renders its controls from it and the assembler reads the
//! submitted values back in the same declared order. The declared order is the
//! order the corresponding classifier was trained on.

use serde::{Deserialize, Serialize};

use super::Disease;

/// Errors raised while turning form values into a feature vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("{disease} expects {expected} values, got {got}")]
    FieldCount {
        disease: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Field {field}: expected a {expected} value")]
    KindMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Field {field}: option index {index} out of range")]
    UnknownOption { field: &'static str, index: usize },
}

/// Input control kind for a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Whole-number input.
    Integer { min: i64, max: i64, default: i64 },

    /// Floating-point input.
    Decimal { min: f64, max: f64, default: f64 },

    /// Two-option selector. `positive` is the index of the option encoded as 1;
    /// the other option encodes as 0. `default` is the index selected initially.
    Categorical {
        options: [&'static str; 2],
        positive: usize,
        default: usize,
    },
}

/// Current value held by a form control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Number(f64),
    Choice(usize),
}

/// One input field of a disease profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Feature key, matching the column name the model was trained with.
    pub key: &'static str,
    /// Human-readable label shown in the form.
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub(crate) const fn integer(
        key: &'static str,
        label: &'static str,
        min: i64,
        max: i64,
        default: i64,
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Integer { min, max, default },
        }
    }

    pub(crate) const fn decimal(
        key: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Decimal { min, max, default },
        }
    }

    pub(crate) const fn categorical(
        key: &'static str,
        label: &'static str,
        options: [&'static str; 2],
        positive: usize,
        default: usize,
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Categorical {
                options,
                positive,
                default,
            },
        }
    }

    /// Inclusive bounds of the encoded value.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        match self.kind {
            FieldKind::Integer { min, max, .. } => (min as f64, max as f64),
            FieldKind::Decimal { min, max, .. } => (min, max),
            FieldKind::Categorical { .. } => (0.0, 1.0),
        }
    }

    /// Value the control starts with.
    #[must_use]
    pub fn default_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Integer { default, .. } => FieldValue::Number(default as f64),
            FieldKind::Decimal { default, .. } => FieldValue::Number(default),
            FieldKind::Categorical { default, .. } => FieldValue::Choice(default),
        }
    }

    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, FieldKind::Categorical { .. })
    }

    /// Option labels for categorical fields.
    #[must_use]
    pub fn options(&self) -> Option<[&'static str; 2]> {
        match self.kind {
            FieldKind::Categorical { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Look up a categorical option by its label.
    #[must_use]
    pub fn choice(&self, label: &str) -> Option<FieldValue> {
        self.options()?
            .iter()
            .position(|o| *o == label)
            .map(FieldValue::Choice)
    }

    /// Bring a raw numeric entry into the control's range.
    ///
    /// Integer fields are rounded to the nearest whole number first. Returns
    /// `None` for categorical fields and non-finite input.
    #[must_use]
    pub fn clamp(&self, raw: f64) -> Option<f64> {
        if !raw.is_finite() {
            return None;
        }
        match self.kind {
            FieldKind::Integer { min, max, .. } => {
                Some(raw.round().clamp(min as f64, max as f64))
            }
            FieldKind::Decimal { min, max, .. } => Some(raw.clamp(min, max)),
            FieldKind::Categorical { .. } => None,
        }
    }

    /// Encode a control value as the model's numeric input.
    ///
    /// # Errors
    /// Returns [`FormError`] if the value kind does not match the field.
    pub fn encode(&self, value: FieldValue) -> Result<f64, FormError> {
        match (self.kind, value) {
            (FieldKind::Integer { .. } | FieldKind::Decimal { .. }, FieldValue::Number(v)) => Ok(v),
            (FieldKind::Categorical { positive, .. }, FieldValue::Choice(index)) => match index {
                0 | 1 if index == positive => Ok(1.0),
                0 | 1 => Ok(0.0),
                _ => Err(FormError::UnknownOption {
                    field: self.key,
                    index,
                }),
            },
            (FieldKind::Categorical { .. }, FieldValue::Number(_)) => Err(FormError::KindMismatch {
                field: self.key,
                expected: "categorical",
            }),
            (_, FieldValue::Choice(_)) => Err(FormError::KindMismatch {
                field: self.key,
                expected: "numeric",
            }),
        }
    }
}

/// Static input schema for one disease.
#[derive(Debug)]
pub struct DiseaseProfile {
    pub disease: Disease,
    /// Bumped whenever fields are added, removed or reordered.
    pub schema_version: u32,
    pub fields: &'static [FieldSpec],
}

impl DiseaseProfile {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.disease.name()
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Feature keys in declared order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.key)
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Control values with every field at its default.
    #[must_use]
    pub fn defaults(&self) -> Vec<FieldValue> {
        self.fields.iter().map(FieldSpec::default_value).collect()
    }

    /// Build the feature vector from control values given in declared order.
    ///
    /// # Errors
    /// Returns [`FormError`] if the value count or any value kind is wrong.
    pub fn assemble(&self, values: &[FieldValue]) -> Result<FeatureVector, FormError> {
        if values.len() != self.fields.len() {
            return Err(FormError::FieldCount {
                disease: self.name(),
                expected: self.fields.len(),
                got: values.len(),
            });
        }

        let encoded = self
            .fields
            .iter()
            .zip(values)
            .map(|(field, value)| field.encode(*value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureVector {
            disease: self.disease,
            values: encoded,
        })
    }
}

/// Ordered numeric model input for one disease.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    disease: Disease,
    values: Vec<f64>,
}

impl FeatureVector {
    #[must_use]
    pub fn disease(&self) -> Disease {
        self.disease
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kidney() -> &'static DiseaseProfile {
        Disease::Kidney.profile()
    }

    #[test]
    fn test_kidney_defaults_assemble_in_declared_order() {
        let profile = kidney();
        let vector = profile.assemble(&profile.defaults()).expect("Should assemble");

        let expected = [
            45.0, 80.0, 1.02, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 120.0, 50.0, 1.2, 135.0, 4.5, 13.5,
            40.0, 8000.0, 4.8, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0,
        ];
        assert_eq!(vector.as_slice(), &expected);
        assert_eq!(vector.disease(), Disease::Kidney);
    }

    #[test]
    fn test_field_counts() {
        for (disease, count) in [
            (Disease::Kidney, 24),
            (Disease::Liver, 10),
            (Disease::Parkinsons, 22),
        ] {
            let profile = disease.profile();
            let vector = profile.assemble(&profile.defaults()).expect("Should assemble");
            assert_eq!(vector.len(), count, "{disease:?}");
        }
    }

    #[test]
    fn test_liver_defaults() {
        let profile = Disease::Liver.profile();
        let vector = profile.assemble(&profile.defaults()).expect("Should assemble");
        assert_eq!(
            vector.as_slice(),
            &[45.0, 1.0, 1.0, 0.5, 200.0, 30.0, 40.0, 6.5, 3.3, 1.0]
        );
    }

    #[test]
    fn test_categorical_encoding_direction() {
        let profile = kidney();
        for key in ["rbc", "pc"] {
            let field = profile.field(key).expect("field exists");
            assert_eq!(field.encode(field.choice("Normal").unwrap()), Ok(1.0));
            assert_eq!(field.encode(field.choice("Abnormal").unwrap()), Ok(0.0));
        }
        for key in ["pcc", "ba"] {
            let field = profile.field(key).expect("field exists");
            assert_eq!(field.encode(field.choice("Present").unwrap()), Ok(1.0));
            assert_eq!(field.encode(field.choice("Not Present").unwrap()), Ok(0.0));
        }

        let appet = profile.field("appet").expect("field exists");
        assert_eq!(appet.encode(appet.choice("Good").unwrap()), Ok(1.0));
        assert_eq!(appet.encode(appet.choice("Poor").unwrap()), Ok(0.0));

        let gender = Disease::Liver.profile().field("gender").expect("field exists");
        assert_eq!(gender.encode(gender.choice("Male").unwrap()), Ok(1.0));
        assert_eq!(gender.encode(gender.choice("Female").unwrap()), Ok(0.0));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let profile = Disease::Parkinsons.profile();
        let mut values = profile.defaults();
        values[0] = FieldValue::Number(197.076);
        values[18] = FieldValue::Number(-7.3);

        let a = profile.assemble(&values).expect("Should assemble");
        let b = profile.assemble(&values).expect("Should assemble");
        assert_eq!(a, b);
        assert!((a.as_slice()[0] - 197.076).abs() < f64::EPSILON);
        assert!((a.as_slice()[18] + 7.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_assemble_rejects_wrong_count() {
        let profile = Disease::Liver.profile();
        let mut values = profile.defaults();
        values.pop();

        let err = profile.assemble(&values).unwrap_err();
        assert_eq!(
            err,
            FormError::FieldCount {
                disease: "Liver Disease",
                expected: 10,
                got: 9
            }
        );
    }

    #[test]
    fn test_assemble_rejects_kind_mismatch() {
        let profile = Disease::Liver.profile();
        let mut values = profile.defaults();
        values[1] = FieldValue::Number(1.0); // gender is categorical

        assert!(matches!(
            profile.assemble(&values),
            Err(FormError::KindMismatch { field: "gender", .. })
        ));

        values[1] = FieldValue::Choice(2);
        assert!(matches!(
            profile.assemble(&values),
            Err(FormError::UnknownOption { field: "gender", index: 2 })
        ));
    }

    #[test]
    fn test_clamp() {
        let profile = kidney();
        let age = profile.field("age").expect("field exists");
        assert_eq!(age.clamp(150.0), Some(120.0));
        assert_eq!(age.clamp(44.6), Some(45.0));
        assert_eq!(age.clamp(-3.0), Some(0.0));
        assert_eq!(age.clamp(f64::NAN), None);

        let sg = profile.field("sg").expect("field exists");
        assert_eq!(sg.clamp(1.2), Some(1.05));
        assert_eq!(sg.clamp(1.015), Some(1.015));

        let rbc = profile.field("rbc").expect("field exists");
        assert_eq!(rbc.clamp(1.0), None);
    }
}

//! Prediction result types.
//!
//! Represents the output of a disease classifier and its interpretation
//! for display.

use serde::{Deserialize, Serialize};

use super::Disease;

/// Positive-class probability below which a result is low risk.
pub const MODERATE_RISK_THRESHOLD: f64 = 0.30;

/// Positive-class probability at or above which a result is high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;

/// Three-tier risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// p < 0.30
    Low,
    /// 0.30 <= p < 0.70
    Moderate,
    /// p >= 0.70
    High,
}

impl RiskLevel {
    /// Map a positive-class probability to its tier.
    ///
    /// Intervals are half-open; each boundary belongs to the higher tier.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability < MODERATE_RISK_THRESHOLD {
            Self::Low
        } else if probability < HIGH_RISK_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Icon shown next to the tier label.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Low => "●",
            Self::Moderate => "▲",
            Self::High => "■",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129),      // Emerald (#10B981)
            Self::Moderate => (249, 115, 22), // Orange (#F97316)
            Self::High => (244, 63, 94),      // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low Risk"),
            Self::Moderate => write!(f, "Moderate Risk"),
            Self::High => write!(f, "High Risk"),
        }
    }
}

/// Classifier output for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class (0 = not likely, 1 = likely)
    pub label: u8,

    /// Positive-class probability (0.0 to 1.0)
    pub probability: f64,

    pub risk_level: RiskLevel,
}

impl PredictionResult {
    #[must_use]
    pub fn new(label: u8, probability: f64) -> Self {
        Self {
            label,
            probability,
            risk_level: RiskLevel::from_probability(probability),
        }
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.label == 1
    }
}

/// A prediction ready for rendering.
#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub disease: Disease,
    pub result: PredictionResult,
    pub evaluated_at: chrono::DateTime<chrono::Local>,
}

impl PredictionReport {
    #[must_use]
    pub fn new(disease: Disease, result: PredictionResult) -> Self {
        Self {
            disease,
            result,
            evaluated_at: chrono::Local::now(),
        }
    }

    /// Verdict sentence for the predicted class.
    #[must_use]
    pub fn verdict(&self) -> String {
        if self.result.is_positive() {
            format!("The patient is likely to have {}.", self.disease.name())
        } else {
            format!("The patient is not likely to have {}.", self.disease.name())
        }
    }

    /// Probability as a percentage with two decimals, e.g. `"42.17%"`.
    #[must_use]
    pub fn probability_text(&self) -> String {
        format_percentage(self.result.probability)
    }

    /// Label of the probability metric.
    #[must_use]
    pub fn metric_label(&self) -> String {
        format!("Predicted Probability for {}", self.disease.name())
    }

    /// Final value of the progress gauge, in whole percent.
    #[must_use]
    pub fn progress_target(&self) -> u16 {
        (self.result.probability * 100.0).round().clamp(0.0, 100.0) as u16
    }
}

/// Format a probability in [0, 1] as a percentage string.
#[must_use]
pub fn format_percentage(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_from_probability() {
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.1), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.5), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.9), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(1.0), RiskLevel::High);
    }

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(RiskLevel::from_probability(0.2999999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.30), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.6999999), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.70), RiskLevel::High);
    }

    #[test]
    fn test_risk_level_is_monotonic() {
        let mut previous = RiskLevel::Low;
        for i in 0..=1000 {
            let level = RiskLevel::from_probability(f64::from(i) / 1000.0);
            let rank = |l: RiskLevel| match l {
                RiskLevel::Low => 0,
                RiskLevel::Moderate => 1,
                RiskLevel::High => 2,
            };
            assert!(rank(level) >= rank(previous));
            previous = level;
        }
    }

    #[test]
    fn test_verdict_and_formatting() {
        let report = PredictionReport::new(Disease::Liver, PredictionResult::new(1, 0.42173));
        assert_eq!(report.verdict(), "The patient is likely to have Liver Disease.");
        assert_eq!(report.probability_text(), "42.17%");
        assert_eq!(report.progress_target(), 42);
        assert_eq!(report.result.risk_level, RiskLevel::Moderate);
        assert_eq!(
            report.metric_label(),
            "Predicted Probability for Liver Disease"
        );

        let report = PredictionReport::new(Disease::Kidney, PredictionResult::new(0, 0.012));
        assert_eq!(
            report.verdict(),
            "The patient is not likely to have Kidney Disease."
        );
        assert_eq!(report.probability_text(), "1.20%");
        assert_eq!(report.progress_target(), 1);
    }

    #[test]
    fn test_progress_target_rounds() {
        let at = |p| PredictionReport::new(Disease::Parkinsons, PredictionResult::new(1, p));
        assert_eq!(at(0.996).progress_target(), 100);
        assert_eq!(at(0.994).progress_target(), 99);
        assert_eq!(at(1.0).progress_target(), 100);
        assert_eq!(at(0.0).progress_target(), 0);
    }

    #[test]
    fn test_risk_display() {
        assert_eq!(RiskLevel::Low.to_string(), "Low Risk");
        assert_eq!(RiskLevel::Moderate.to_string(), "Moderate Risk");
        assert_eq!(RiskLevel::High.to_string(), "High Risk");
    }
}

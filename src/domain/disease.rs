//! The three supported diseases and their input schemas.
//!
//! Field order in each table is the feature order of the matching model.
//! Reordering a table silently corrupts predictions; bump `schema_version`
//! and retrain/re-export the model instead.

use serde::{Deserialize, Serialize};

use super::profile::{DiseaseProfile, FieldSpec};

/// Disease selectable in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disease {
    Kidney,
    Liver,
    Parkinsons,
}

impl Disease {
    /// All diseases in selector order.
    pub const ALL: [Disease; 3] = [Disease::Kidney, Disease::Liver, Disease::Parkinsons];

    /// Display name used in headings and verdict sentences.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kidney => "Kidney Disease",
            Self::Liver => "Liver Disease",
            Self::Parkinsons => "Parkinson's Disease",
        }
    }

    /// File name of the model artifact inside the model directory.
    #[must_use]
    pub fn artifact_file(&self) -> &'static str {
        match self {
            Self::Kidney => "kidney_model.json",
            Self::Liver => "liver_model.json",
            Self::Parkinsons => "parkinsons_model.json",
        }
    }

    #[must_use]
    pub fn profile(&self) -> &'static DiseaseProfile {
        match self {
            Self::Kidney => &KIDNEY,
            Self::Liver => &LIVER,
            Self::Parkinsons => &PARKINSONS,
        }
    }
}

impl std::fmt::Display for Disease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const NORMAL_ABNORMAL: [&str; 2] = ["Normal", "Abnormal"];
const NOT_PRESENT_PRESENT: [&str; 2] = ["Not Present", "Present"];
const NO_YES: [&str; 2] = ["No", "Yes"];

/// Chronic kidney disease (UCI CKD columns).
pub static KIDNEY: DiseaseProfile = DiseaseProfile {
    disease: Disease::Kidney,
    schema_version: 1,
    fields: &[
        FieldSpec::integer("age", "Age", 0, 120, 45),
        FieldSpec::decimal("bp", "Blood Pressure", 0.0, 200.0, 80.0),
        FieldSpec::decimal("sg", "Specific Gravity", 1.0, 1.05, 1.02),
        FieldSpec::decimal("al", "Albumin", 0.0, 5.0, 1.0),
        FieldSpec::decimal("su", "Sugar", 0.0, 5.0, 0.0),
        // Normal encodes as 1 here, unlike the presence fields below.
        FieldSpec::categorical("rbc", "Red Blood Cells", NORMAL_ABNORMAL, 0, 0),
        FieldSpec::categorical("pc", "Pus Cell", NORMAL_ABNORMAL, 0, 0),
        FieldSpec::categorical("pcc", "Pus Cell Clumps", NOT_PRESENT_PRESENT, 1, 0),
        FieldSpec::categorical("ba", "Bacteria", NOT_PRESENT_PRESENT, 1, 0),
        FieldSpec::decimal("bgr", "Blood Glucose Random", 0.0, 500.0, 120.0),
        FieldSpec::decimal("bu", "Blood Urea", 0.0, 300.0, 50.0),
        FieldSpec::decimal("sc", "Serum Creatinine", 0.0, 15.0, 1.2),
        FieldSpec::decimal("sod", "Sodium", 100.0, 200.0, 135.0),
        FieldSpec::decimal("pot", "Potassium", 0.0, 10.0, 4.5),
        FieldSpec::decimal("hemo", "Hemoglobin", 3.0, 20.0, 13.5),
        FieldSpec::decimal("pcv", "Packed Cell Volume", 0.0, 60.0, 40.0),
        FieldSpec::decimal("wc", "White Blood Cell Count", 0.0, 25000.0, 8000.0),
        FieldSpec::decimal("rc", "Red Blood Cell Count", 0.0, 10.0, 4.8),
        FieldSpec::categorical("htn", "Hypertension", NO_YES, 1, 0),
        FieldSpec::categorical("dm", "Diabetes Mellitus", NO_YES, 1, 0),
        FieldSpec::categorical("cad", "Coronary Artery Disease", NO_YES, 1, 0),
        FieldSpec::categorical("appet", "Appetite", ["Poor", "Good"], 1, 1),
        FieldSpec::categorical("pe", "Pedal Edema", NO_YES, 1, 0),
        FieldSpec::categorical("ane", "Anemia", NO_YES, 1, 0),
    ],
};

/// Indian liver patient records.
pub static LIVER: DiseaseProfile = DiseaseProfile {
    disease: Disease::Liver,
    schema_version: 1,
    fields: &[
        FieldSpec::integer("age", "Age", 0, 120, 45),
        FieldSpec::categorical("gender", "Gender", ["Male", "Female"], 0, 0),
        FieldSpec::decimal("tb", "Total Bilirubin", 0.0, 75.0, 1.0),
        FieldSpec::decimal("db", "Direct Bilirubin", 0.0, 19.0, 0.5),
        FieldSpec::integer("alkphos", "Alkaline Phosphotase", 0, 2000, 200),
        FieldSpec::integer("alt", "Alamine Aminotransferase", 0, 2000, 30),
        FieldSpec::integer("ast", "Aspartate Aminotransferase", 0, 2000, 40),
        FieldSpec::decimal("tp", "Total Proteins", 0.0, 10.0, 6.5),
        FieldSpec::decimal("alb", "Albumin", 0.0, 6.0, 3.3),
        FieldSpec::decimal("ag", "A/G Ratio", 0.0, 3.0, 1.0),
    ],
};

/// Oxford Parkinson's voice measurements.
pub static PARKINSONS: DiseaseProfile = DiseaseProfile {
    disease: Disease::Parkinsons,
    schema_version: 1,
    fields: &[
        FieldSpec::decimal("fo", "MDVP:Fo(Hz)", 0.0, 300.0, 120.0),
        FieldSpec::decimal("fhi", "MDVP:Fhi(Hz)", 0.0, 600.0, 150.0),
        FieldSpec::decimal("flo", "MDVP:Flo(Hz)", 0.0, 300.0, 80.0),
        FieldSpec::decimal("jitter_percent", "MDVP:Jitter(%)", 0.0, 1.0, 0.005),
        FieldSpec::decimal("jitter_abs", "MDVP:Jitter(Abs)", 0.0, 1.0, 0.00005),
        FieldSpec::decimal("rap", "MDVP:RAP", 0.0, 1.0, 0.003),
        FieldSpec::decimal("ppq", "MDVP:PPQ", 0.0, 1.0, 0.003),
        FieldSpec::decimal("ddp", "Jitter:DDP", 0.0, 1.0, 0.009),
        FieldSpec::decimal("shimmer", "MDVP:Shimmer", 0.0, 1.0, 0.03),
        FieldSpec::decimal("shimmer_db", "MDVP:Shimmer(dB)", 0.0, 2.0, 0.3),
        FieldSpec::decimal("apq3", "Shimmer:APQ3", 0.0, 1.0, 0.02),
        FieldSpec::decimal("apq5", "Shimmer:APQ5", 0.0, 1.0, 0.03),
        FieldSpec::decimal("apq", "MDVP:APQ", 0.0, 1.0, 0.03),
        FieldSpec::decimal("dda", "Shimmer:DDA", 0.0, 1.0, 0.01),
        FieldSpec::decimal("nhr", "NHR", 0.0, 1.0, 0.02),
        FieldSpec::decimal("hnr", "HNR", 0.0, 50.0, 20.0),
        FieldSpec::decimal("rpde", "RPDE", 0.0, 1.0, 0.45),
        FieldSpec::decimal("dfa", "DFA", 0.0, 1.0, 0.65),
        FieldSpec::decimal("spread1", "spread1", -10.0, 1.0, -4.0),
        FieldSpec::decimal("spread2", "spread2", 0.0, 1.0, 0.3),
        FieldSpec::decimal("d2", "D2", 0.0, 5.0, 2.0),
        FieldSpec::decimal("ppe", "PPE", 0.0, 1.0, 0.2),
    ],
};

// src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PredictError;

/// The user-editable record sent to the prediction service.
///
/// Every value is kept exactly as typed; an untouched numeric input is the
/// empty string. Key names match the collaborator's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub gender: String,
    pub age: String,
    pub hypertension: String,
    pub heart_disease: String,
    pub smoking_history: String,
    pub bmi: String,
    #[serde(rename = "HbA1c_level")]
    pub hba1c_level: String,
    pub blood_glucose_level: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            gender: "Male".to_string(),
            age: String::new(),
            hypertension: "0".to_string(),
            heart_disease: "0".to_string(),
            smoking_history: "never".to_string(),
            bmi: String::new(),
            hba1c_level: String::new(),
            blood_glucose_level: String::new(),
        }
    }
}

impl FormState {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Gender => &self.gender,
            Field::Age => &self.age,
            Field::Hypertension => &self.hypertension,
            Field::HeartDisease => &self.heart_disease,
            Field::SmokingHistory => &self.smoking_history,
            Field::Bmi => &self.bmi,
            Field::Hba1cLevel => &self.hba1c_level,
            Field::BloodGlucoseLevel => &self.blood_glucose_level,
        }
    }

    /// Replaces one field, leaving the rest untouched.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Gender => &mut self.gender,
            Field::Age => &mut self.age,
            Field::Hypertension => &mut self.hypertension,
            Field::HeartDisease => &mut self.heart_disease,
            Field::SmokingHistory => &mut self.smoking_history,
            Field::Bmi => &mut self.bmi,
            Field::Hba1cLevel => &mut self.hba1c_level,
            Field::BloodGlucoseLevel => &mut self.blood_glucose_level,
        };
        *slot = value.into();
    }
}

/// Names of the form inputs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Gender,
    Age,
    Hypertension,
    HeartDisease,
    SmokingHistory,
    Bmi,
    Hba1cLevel,
    BloodGlucoseLevel,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Gender,
        Field::Age,
        Field::Hypertension,
        Field::HeartDisease,
        Field::SmokingHistory,
        Field::Bmi,
        Field::Hba1cLevel,
        Field::BloodGlucoseLevel,
    ];

    /// Wire and input name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Gender => "gender",
            Field::Age => "age",
            Field::Hypertension => "hypertension",
            Field::HeartDisease => "heart_disease",
            Field::SmokingHistory => "smoking_history",
            Field::Bmi => "bmi",
            Field::Hba1cLevel => "HbA1c_level",
            Field::BloodGlucoseLevel => "blood_glucose_level",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Gender => "Gender",
            Field::Age => "Age",
            Field::Hypertension => "Hypertension",
            Field::HeartDisease => "Heart Disease",
            Field::SmokingHistory => "Smoking History",
            Field::Bmi => "BMI",
            Field::Hba1cLevel => "HbA1c Level",
            Field::BloodGlucoseLevel => "Blood Glucose Level",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| PredictError::UnknownField(s.to_string()))
    }
}

/// Permitted values for the two categorical inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOptions {
    pub gender_options: Vec<String>,
    pub smoking_history_options: Vec<String>,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            gender_options: ["Male", "Female", "Other"].map(String::from).to_vec(),
            smoking_history_options: ["never", "former", "current", "ever", "No Info"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Availability of the prediction service, derived from the options fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub running: bool,
    #[serde(rename = "modelLoaded")]
    pub model_loaded: bool,
}

impl ApiStatus {
    pub fn ready() -> Self {
        Self {
            running: true,
            model_loaded: true,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.running && self.model_loaded
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: u8,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PredictionResult {
    pub fn is_positive(&self) -> bool {
        self.prediction == 1
    }

    /// Probability as a percentage with two decimals, e.g. `87.00%`.
    pub fn probability_percent(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}

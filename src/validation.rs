// src/validation.rs
//! Input-level constraints that must hold before a submission may start.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::models::{FeatureOptions, Field, FormState};

// Same grammar a browser number input accepts.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(\d+(\.\d+)?|\.\d+)([eE][+-]?\d+)?$").expect("number pattern is valid")
});

/// Range and step bounds of a numeric input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl NumericBounds {
    /// The `step` attribute as the page renders it.
    pub fn step_attr(&self) -> String {
        format!("{}", self.step)
    }
}

/// Bounds for the numeric inputs; `None` for categorical fields.
pub fn numeric_bounds(field: Field) -> Option<NumericBounds> {
    let (min, max, step) = match field {
        Field::Age => (0.0, 120.0, 1.0),
        Field::Bmi => (10.0, 60.0, 0.01),
        Field::Hba1cLevel => (3.0, 9.0, 0.1),
        Field::BloodGlucoseLevel => (70.0, 300.0, 1.0),
        _ => return None,
    };
    Some(NumericBounds { min, max, step })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    Missing { field: String },
    NotANumber { field: String },
    BelowMin { field: String, min: f64 },
    AboveMax { field: String, max: f64 },
    StepMismatch { field: String, step: f64 },
    NotAnOption { field: String, value: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing { field } => write!(f, "{field} is required"),
            Violation::NotANumber { field } => write!(f, "{field} must be a number"),
            Violation::BelowMin { field, min } => write!(f, "{field} must be at least {min}"),
            Violation::AboveMax { field, max } => write!(f, "{field} must be at most {max}"),
            Violation::StepMismatch { field, step } => {
                write!(f, "{field} must be a multiple of {step}")
            }
            Violation::NotAnOption { field, value } => {
                write!(f, "'{value}' is not a valid choice for {field}")
            }
        }
    }
}

/// Checks every field and returns all violations, in field order.
pub fn validate(form: &FormState, options: &FeatureOptions) -> Vec<Violation> {
    Field::ALL
        .into_iter()
        .filter_map(|field| check_field(field, form.get(field), options))
        .collect()
}

// Checks the raw value: it is exactly what gets posted.
fn check_field(field: Field, value: &str, options: &FeatureOptions) -> Option<Violation> {
    let name = field.name().to_string();

    if value.is_empty() {
        return Some(Violation::Missing { field: name });
    }

    let allowed: &[String] = match field {
        Field::Gender => &options.gender_options,
        Field::SmokingHistory => &options.smoking_history_options,
        Field::Hypertension | Field::HeartDisease => {
            return (value != "0" && value != "1").then(|| Violation::NotAnOption {
                field: name,
                value: value.to_string(),
            });
        }
        _ => return numeric_bounds(field).and_then(|bounds| check_number(name, value, bounds)),
    };

    (!allowed.iter().any(|option| option == value)).then(|| Violation::NotAnOption {
        field: name,
        value: value.to_string(),
    })
}

fn check_number(field: String, value: &str, bounds: NumericBounds) -> Option<Violation> {
    if !NUMBER.is_match(value) {
        return Some(Violation::NotANumber { field });
    }
    let Ok(number) = value.parse::<f64>() else {
        return Some(Violation::NotANumber { field });
    };
    if number < bounds.min {
        return Some(Violation::BelowMin {
            field,
            min: bounds.min,
        });
    }
    if number > bounds.max {
        return Some(Violation::AboveMax {
            field,
            max: bounds.max,
        });
    }

    let steps = (number - bounds.min) / bounds.step;
    if (steps - steps.round()).abs() > 1e-7 {
        return Some(Violation::StepMismatch {
            field,
            step: bounds.step,
        });
    }
    None
}

// src/errors.rs
use thiserror::Error;

/// Message shown when the prediction service fails without explaining why.
pub const GENERIC_PREDICT_ERROR: &str = "An error occurred while making the prediction";

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The collaborator never produced a response (connect/DNS failure, dropped connection).
    #[error("Prediction service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The collaborator answered with a non-success status.
    #[error("Prediction service rejected the request with status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("Unexpected response structure: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown form field '{0}'")]
    UnknownField(String),
}

impl PredictError {
    /// True when the collaborator itself produced this failure, i.e. it is running.
    pub fn has_response(&self) -> bool {
        matches!(
            self,
            PredictError::Rejected { .. } | PredictError::UnexpectedResponse(_)
        )
    }

    /// The human-readable text for the error alert under the form.
    pub fn user_message(&self) -> String {
        match self {
            PredictError::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => GENERIC_PREDICT_ERROR.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_with_payload_surfaces_message() {
        let err = PredictError::Rejected {
            status: 400,
            message: Some("invalid bmi".to_string()),
        };
        assert!(err.has_response());
        assert_eq!(err.user_message(), "invalid bmi");
    }

    #[test]
    fn rejected_without_payload_falls_back() {
        let err = PredictError::Rejected {
            status: 500,
            message: None,
        };
        assert!(err.has_response());
        assert_eq!(err.user_message(), GENERIC_PREDICT_ERROR);
    }

    #[test]
    fn empty_payload_message_falls_back() {
        let err = PredictError::Rejected {
            status: 400,
            message: Some(String::new()),
        };
        assert_eq!(err.user_message(), GENERIC_PREDICT_ERROR);
    }

    #[test]
    fn config_errors_are_not_server_responses() {
        let err = PredictError::Config("bad port".to_string());
        assert!(!err.has_response());
        assert_eq!(err.user_message(), GENERIC_PREDICT_ERROR);
    }
}

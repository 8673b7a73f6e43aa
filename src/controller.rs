// src/controller.rs
//! The form/request lifecycle of one displayed page.

use thiserror::Error;

use crate::backend::PredictionBackend;
use crate::errors::{PredictError, Result};
use crate::models::{ApiStatus, FeatureOptions, Field, FormState, PredictionResult};
use crate::validation::{self, Violation};

/// Where the request lifecycle currently stands.
///
/// The result and the error live inside their variants, so a page can never
/// show a spinner and a result at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded(PredictionResult),
    Failed(String),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::Succeeded(_) => "succeeded",
            Phase::Failed(_) => "failed",
        }
    }
}

/// Why a submission did not start.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitBlocked {
    #[error("The submit control is disabled")]
    Disabled,

    #[error("The form has {} invalid field(s)", .0.len())]
    Invalid(Vec<Violation>),
}

pub struct PredictionController {
    form: FormState,
    options: FeatureOptions,
    api_status: ApiStatus,
    phase: Phase,
    options_requested: bool,
}

impl Default for PredictionController {
    fn default() -> Self {
        Self::new(FeatureOptions::default())
    }
}

impl PredictionController {
    /// A fresh page: default form, fallback options, service assumed down until checked.
    pub fn new(fallback_options: FeatureOptions) -> Self {
        Self {
            form: FormState::default(),
            options: fallback_options,
            api_status: ApiStatus::default(),
            phase: Phase::Idle,
            options_requested: false,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn options(&self) -> &FeatureOptions {
        &self.options
    }

    pub fn api_status(&self) -> ApiStatus {
        self.api_status
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.phase {
            Phase::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Recomputed on every call, never stored.
    pub fn submit_disabled(&self) -> bool {
        self.is_submitting() || !self.api_status.running || !self.api_status.model_loaded
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Field edit by input name. Unknown names change nothing.
    pub fn update_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field: Field = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    /// Restores the default form and clears the result or error.
    ///
    /// A request already in flight is not cancelled; its outcome still lands.
    pub fn reset(&mut self) {
        self.form = FormState::default();
        if !self.is_submitting() {
            self.phase = Phase::Idle;
        }
    }

    pub fn options_resolved(&mut self, options: FeatureOptions) {
        self.options = options;
        self.api_status = ApiStatus::ready();
    }

    pub fn options_rejected(&mut self, err: &PredictError) {
        log::error!("Error fetching features: {}", err);
        self.api_status = ApiStatus {
            running: err.has_response(),
            model_loaded: false,
        };
    }

    /// Violations that would block a submission right now.
    pub fn violations(&self) -> Vec<Violation> {
        validation::validate(&self.form, &self.options)
    }

    /// Enters `Submitting` and hands back the payload to send.
    pub fn begin_submit(&mut self) -> std::result::Result<FormState, SubmitBlocked> {
        if self.submit_disabled() {
            return Err(SubmitBlocked::Disabled);
        }
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(SubmitBlocked::Invalid(violations));
        }

        self.phase = Phase::Submitting;
        Ok(self.form.clone())
    }

    /// Records the outcome of the request started by `begin_submit`.
    pub fn resolve_submit(&mut self, outcome: Result<PredictionResult>) {
        if !self.is_submitting() {
            log::warn!("Ignoring prediction outcome with no request in flight");
            return;
        }

        self.phase = match outcome {
            Ok(result) => {
                log::info!(
                    "Prediction {} with probability {}",
                    result.prediction,
                    result.probability_percent()
                );
                Phase::Succeeded(result)
            }
            Err(e) => {
                log::error!("Error making prediction: {}", e);
                Phase::Failed(e.user_message())
            }
        };
    }

    /// Runs the options fetch. Only the first call per controller does anything.
    pub async fn load_options<B: PredictionBackend>(&mut self, backend: &B) {
        if self.options_requested {
            log::debug!("Feature options already requested for this page");
            return;
        }
        self.options_requested = true;

        match backend.fetch_features().await {
            Ok(options) => self.options_resolved(options),
            Err(e) => self.options_rejected(&e),
        }
    }

    /// Submits the form and waits for the outcome.
    pub async fn submit<B: PredictionBackend>(
        &mut self,
        backend: &B,
    ) -> std::result::Result<(), SubmitBlocked> {
        let payload = self.begin_submit()?;
        let outcome = backend.predict(&payload).await;
        self.resolve_submit(outcome);
        Ok(())
    }
}

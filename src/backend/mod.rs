// src/backend/mod.rs

use crate::errors::Result;
use crate::models::{FeatureOptions, FormState, PredictionResult};

pub mod http;

pub use http::HttpBackend;

/// The remote prediction service the form talks to.
///
/// Implementations must keep the two failure classes apart: a failure with no
/// response at all is `PredictError::Unreachable`, anything the service itself
/// answered is `PredictError::Rejected` or `PredictError::UnexpectedResponse`.
///
/// Note: We're not using async_trait here, so implementers must handle async directly.
pub trait PredictionBackend: Send + Sync {
    /// `GET /api/features`: the permitted categorical values.
    fn fetch_features(&self) -> impl std::future::Future<Output = Result<FeatureOptions>> + Send;

    /// `POST /api/predict` with the form as the JSON body.
    fn predict(
        &self,
        form: &FormState,
    ) -> impl std::future::Future<Output = Result<PredictionResult>> + Send;
}

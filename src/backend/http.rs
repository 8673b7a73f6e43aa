// src/backend/http.rs

use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Instant;

use crate::backend::PredictionBackend;
use crate::errors::{PredictError, Result};
use crate::models::{FeatureOptions, FormState, PredictionResult};

/// Talks to the prediction service over HTTP/JSON.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    api_base: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpBackend {
    /// Creates a new `HttpBackend`. No request timeout is applied.
    pub fn new(client: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { client, api_base }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

/// Turns a response into `T`, or into a `Rejected` error carrying the body's `error` field.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty());
        return Err(PredictError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| PredictError::UnexpectedResponse(e.to_string()))
}

impl PredictionBackend for HttpBackend {
    async fn fetch_features(&self) -> Result<FeatureOptions> {
        let url = self.url("/api/features");
        log::debug!("Fetching feature options from {}", url);

        let resp = self.client.get(&url).send().await?;
        log::debug!("Feature options response status: {}", resp.status());

        decode(resp).await
    }

    async fn predict(&self, form: &FormState) -> Result<PredictionResult> {
        let url = self.url("/api/predict");
        log::info!("Requesting prediction from {}", url);

        let start = Instant::now();
        let resp = self.client.post(&url).json(form).send().await?;
        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;
        log::info!("Prediction response status: {} ({}ms)", status, latency_ms);

        let result: PredictionResult = decode(resp).await?;
        if result.prediction > 1 || !(0.0..=1.0).contains(&result.probability) {
            return Err(PredictError::UnexpectedResponse(format!(
                "prediction {} with probability {} is out of range",
                result.prediction, result.probability
            )));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let backend = HttpBackend::new(Client::new(), "http://localhost:5000/");
        assert_eq!(backend.api_base(), "http://localhost:5000");
        assert_eq!(
            backend.url("/api/features"),
            "http://localhost:5000/api/features"
        );
    }
}

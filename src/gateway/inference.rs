//! Prediction Service Gateway
//!
//! Forwards soil parameters to an external model endpoint. The response
//! schema is not ours, so parsing is lenient: missing fields default.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;
use crate::recommendation::SoilParameters;

/// Raw model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub fertilizer: String,
    pub application_rate: String,
    #[serde(default)]
    pub confidence: f64,
}

impl Prediction {
    /// Read a prediction out of an arbitrary JSON response.
    ///
    /// Accepts either an object or a list whose first element is the
    /// object. Absent fields become "Unknown" / 0.0.
    pub fn from_response(value: &Value) -> Self {
        let body = match value {
            Value::Array(items) => items.first(),
            other => Some(other),
        };
        let field = |key: &str| body.and_then(|b| b.get(key));

        let text = |key: &str| {
            field(key)
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown")
                .to_string()
        };

        Self {
            fertilizer: text("fertilizer"),
            application_rate: text("application_rate"),
            confidence: field("confidence").and_then(|v| v.as_f64()).unwrap_or(0.0),
        }
    }
}

/// Prediction plus application suggestions, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub fertilizer: String,
    pub application_rate: String,
    pub additional_suggestions: Vec<String>,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl PredictionResult {
    pub fn new(prediction: Prediction, additional_suggestions: Vec<String>) -> Self {
        Self {
            fertilizer: prediction.fertilizer,
            application_rate: prediction.application_rate,
            additional_suggestions,
            confidence: prediction.confidence,
            timestamp: Utc::now(),
        }
    }
}

/// Request body sent to the model endpoint
pub fn build_inference_payload(params: &SoilParameters) -> Value {
    json!({ "inputs": params })
}

#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn predict(&self, params: &SoilParameters) -> Result<Prediction>;
}

// ============================================================================
// HTTP client
// ============================================================================

#[cfg(feature = "api")]
pub use http::HttpInferenceClient;

#[cfg(feature = "api")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::Value;
    use tracing::{debug, error};

    use super::{build_inference_payload, InferenceClient, Prediction};
    use crate::error::{Result, SoilSyncError};
    use crate::recommendation::SoilParameters;

    /// Bearer-token authenticated model endpoint
    #[derive(Debug, Clone)]
    pub struct HttpInferenceClient {
        client: reqwest::Client,
        url: String,
        token: String,
    }

    impl HttpInferenceClient {
        pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                url: url.into(),
                token: token.into(),
            }
        }
    }

    #[async_trait]
    impl InferenceClient for HttpInferenceClient {
        async fn predict(&self, params: &SoilParameters) -> Result<Prediction> {
            debug!(crop = %params.crop_type, "Requesting model prediction");

            let response = self
                .client
                .post(&self.url)
                .bearer_auth(&self.token)
                .json(&build_inference_payload(params))
                .timeout(Duration::from_secs(30))
                .send()
                .await
                .map_err(|e| {
                    error!(error = %e, "Prediction request failed");
                    SoilSyncError::Inference(e.to_string())
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %body, "Prediction service returned an error");
                return Err(SoilSyncError::Inference(format!(
                    "prediction service returned {}",
                    status
                )));
            }

            let body: Value = response.json().await.map_err(|e| {
                error!(error = %e, "Failed to parse prediction response");
                SoilSyncError::Inference(e.to_string())
            })?;

            Ok(Prediction::from_response(&body))
        }
    }
}

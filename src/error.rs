//! Library errors
//!
//! The recommendation engine itself cannot fail; these cover the service
//! boundary (validation, storage, outbound prediction/report calls).

use thiserror::Error;

use crate::recommendation::ValidationError;

#[derive(Debug, Error)]
pub enum SoilSyncError {
    #[error("invalid soil parameters: {0}")]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Prediction service unreachable or returned a failure status
    #[error("inference service error: {0}")]
    Inference(String),

    /// Text generation failed or was blocked
    #[error("report service error: {0}")]
    Report(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

pub type Result<T> = std::result::Result<T, SoilSyncError>;

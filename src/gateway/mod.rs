//! Collaborator gateways
//!
//! Narrow interfaces to everything outside the recommendation engine:
//! - `store`: last-submission persistence and history
//! - `inference`: external fertilizer prediction model
//! - `report`: text generation for reports and suggestions

pub mod inference;
pub mod report;
pub mod store;

pub use inference::{InferenceClient, Prediction, PredictionResult};
pub use report::{ReportClient, ReportRequest, ReportResponse};
pub use store::{
    FileSubmissionStore, MemorySubmissionStore, Submission, SubmissionStore,
    DEFAULT_RECENT_LIMIT, HISTORY_CAPACITY, HISTORY_KEY, SUBMISSION_KEY,
};

#[cfg(feature = "api")]
pub use inference::HttpInferenceClient;

#[cfg(feature = "api")]
pub use report::GeminiReportClient;

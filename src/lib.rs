//! Soil Sync
//!
//! Fertilizer recommendations from soil and crop measurements.
//!
//! - `recommendation/`: the pure decision logic (crop table, timing rules,
//!   input validation)
//! - `gateway/`: submission storage and the external prediction/report
//!   services, each behind a small trait
//! - `api_server`: Axum HTTP surface (feature `api`)

pub mod config;
pub mod error;
pub mod gateway;
pub mod recommendation;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use error::{Result, SoilSyncError};
pub use recommendation::{
    advise_timing, resolve_recommendation, ApplicationTiming, CropType, FertilizerRecommendation,
    SoilParameters, SoilType,
};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};

//! Fertilizer Recommendation Engine
//!
//! Pure decision logic, no I/O:
//! - `fertilizer_table`: crop -> fertilizer record with a default fallback
//! - `timing`: humidity/temperature -> application advisory
//! - `validation`: form-range checks for submitted measurements
//! - `types`: input and output records

pub mod fertilizer_table;
pub mod timing;
pub mod types;
pub mod validation;

pub use fertilizer_table::{
    default_recommendation, known_recommendations, resolve_for_crop, resolve_recommendation,
};
pub use timing::{advise_timing, ApplicationTiming};
pub use types::{CropType, FertilizerRecommendation, SoilParameters, SoilType};
pub use validation::ValidationError;

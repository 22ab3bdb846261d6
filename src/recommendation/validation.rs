//! Input Validation
//!
//! Range checks for submitted measurements, using the bounds of the entry
//! form. Applied at the service boundary only; the resolver and timing
//! rules accept any input.

use thiserror::Error;

use super::types::SoilParameters;

/// Inclusive accepted range for one numeric field
#[derive(Debug, Clone)]
pub struct ParameterBounds {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

static PARAMETER_BOUNDS: &[ParameterBounds] = &[
    ParameterBounds { field: "temperature", min: -20.0, max: 50.0 },
    ParameterBounds { field: "humidity", min: 0.0, max: 100.0 },
    ParameterBounds { field: "rainfall", min: 0.0, max: 1000.0 },
    ParameterBounds { field: "nitrogen", min: 0.0, max: 200.0 },
    ParameterBounds { field: "phosphorus", min: 0.0, max: 200.0 },
    ParameterBounds { field: "potassium", min: 0.0, max: 200.0 },
    ParameterBounds { field: "pH", min: 0.0, max: 14.0 },
];

pub fn bounds_for(field: &str) -> Option<&'static ParameterBounds> {
    PARAMETER_BOUNDS.iter().find(|b| b.field == field)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. } => field,
            ValidationError::NotFinite { field } => field,
        }
    }
}

impl SoilParameters {
    /// Check every numeric field against its bounds, reporting the first
    /// violation in form order
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in self.numeric_fields() {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field });
            }
            if let Some(bounds) = bounds_for(field) {
                if value < bounds.min || value > bounds.max {
                    return Err(ValidationError::OutOfRange {
                        field,
                        value,
                        min: bounds.min,
                        max: bounds.max,
                    });
                }
            }
        }
        Ok(())
    }
}

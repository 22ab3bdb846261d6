//! Recommendation Types
//!
//! Input and output records for the recommendation engine: the soil/crop
//! parameter set submitted by a grower and the fertilizer record returned.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Crop Type
// ============================================================================

/// Crop selector for the fertilizer table.
///
/// Labels are matched exactly (case-sensitive, no trimming). Anything that
/// is not one of the ten known labels is kept verbatim in `Other` and
/// resolves to the default recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CropType {
    Wheat,
    Rice,
    Corn,
    Soybean,
    Cotton,
    Sugarcane,
    Potato,
    Tomato,
    Carrot,
    Onion,
    Other(String),
}

impl CropType {
    /// The ten crops with a dedicated table entry, in form order
    pub const KNOWN: [CropType; 10] = [
        CropType::Wheat,
        CropType::Rice,
        CropType::Corn,
        CropType::Soybean,
        CropType::Cotton,
        CropType::Sugarcane,
        CropType::Potato,
        CropType::Tomato,
        CropType::Carrot,
        CropType::Onion,
    ];

    /// Parse a form label. Never fails: unmatched labels become `Other`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Wheat" => CropType::Wheat,
            "Rice" => CropType::Rice,
            "Corn" => CropType::Corn,
            "Soybean" => CropType::Soybean,
            "Cotton" => CropType::Cotton,
            "Sugarcane" => CropType::Sugarcane,
            "Potato" => CropType::Potato,
            "Tomato" => CropType::Tomato,
            "Carrot" => CropType::Carrot,
            "Onion" => CropType::Onion,
            other => CropType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CropType::Wheat => "Wheat",
            CropType::Rice => "Rice",
            CropType::Corn => "Corn",
            CropType::Soybean => "Soybean",
            CropType::Cotton => "Cotton",
            CropType::Sugarcane => "Sugarcane",
            CropType::Potato => "Potato",
            CropType::Tomato => "Tomato",
            CropType::Carrot => "Carrot",
            CropType::Onion => "Onion",
            CropType::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CropType::Other(_))
    }

    /// Crop for a submission that named none; resolves to the default
    pub fn unspecified() -> Self {
        CropType::Other(String::new())
    }
}

impl From<String> for CropType {
    fn from(label: String) -> Self {
        CropType::from_label(&label)
    }
}

impl From<CropType> for String {
    fn from(crop: CropType) -> Self {
        match crop {
            CropType::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Soil Type
// ============================================================================

/// Soil classification chosen on the entry form. Informational only; it
/// does not take part in fertilizer selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SoilType {
    Clay,
    Loamy,
    Sandy,
    Silt,
    Peaty,
    Chalky,
    SandyLoam,
    Other(String),
}

impl SoilType {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Clay" => SoilType::Clay,
            "Loamy" => SoilType::Loamy,
            "Sandy" => SoilType::Sandy,
            "Silt" => SoilType::Silt,
            "Peaty" => SoilType::Peaty,
            "Chalky" => SoilType::Chalky,
            "Sandy Loam" => SoilType::SandyLoam,
            other => SoilType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SoilType::Clay => "Clay",
            SoilType::Loamy => "Loamy",
            SoilType::Sandy => "Sandy",
            SoilType::Silt => "Silt",
            SoilType::Peaty => "Peaty",
            SoilType::Chalky => "Chalky",
            SoilType::SandyLoam => "Sandy Loam",
            SoilType::Other(label) => label,
        }
    }
}

impl From<String> for SoilType {
    fn from(label: String) -> Self {
        SoilType::from_label(&label)
    }
}

impl From<SoilType> for String {
    fn from(soil: SoilType) -> Self {
        match soil {
            SoilType::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Soil Parameters (input)
// ============================================================================

/// One set of field measurements submitted for a recommendation.
///
/// Values are user-supplied. Range checks live in
/// [`SoilParameters::validate`](super::validation) and are never applied
/// by the resolver itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilParameters {
    /// Air temperature (°C)
    pub temperature: f64,

    /// Relative humidity (%)
    pub humidity: f64,

    /// Rainfall (mm)
    pub rainfall: f64,

    // ========================================================================
    // Nutrients (ppm)
    // ========================================================================

    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,

    /// Soil pH (0-14)
    #[serde(rename = "pH")]
    pub ph: f64,

    pub soil_type: SoilType,

    /// Absent in the body means no crop was chosen
    #[serde(default = "CropType::unspecified")]
    pub crop_type: CropType,
}

impl Default for SoilParameters {
    /// Entry form defaults
    fn default() -> Self {
        Self {
            temperature: 25.0,
            humidity: 60.0,
            rainfall: 100.0,
            nitrogen: 40.0,
            phosphorus: 30.0,
            potassium: 20.0,
            ph: 6.5,
            soil_type: SoilType::Clay,
            crop_type: CropType::Wheat,
        }
    }
}

impl SoilParameters {
    /// Numeric fields paired with their wire names, in form order
    pub fn numeric_fields(&self) -> [(&'static str, f64); 7] {
        [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("rainfall", self.rainfall),
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
            ("pH", self.ph),
        ]
    }
}

// ============================================================================
// Fertilizer Recommendation (output)
// ============================================================================

/// Fertilizer record returned for a parameter set. Identity is its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerRecommendation {
    pub name: String,

    /// "N-P-K"
    pub npk_ratio: String,

    /// Quantity with unit, e.g. "250-300 kg/ha"
    pub application_rate: String,

    pub description: String,

    /// Ordered benefit statements
    pub soil_improvement: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_labels_round_trip() {
        for crop in CropType::KNOWN {
            assert_eq!(CropType::from_label(crop.label()), crop);
            assert!(crop.is_known());
        }
    }

    #[test]
    fn test_crop_label_match_is_exact() {
        assert_eq!(CropType::from_label("wheat"), CropType::Other("wheat".to_string()));
        assert_eq!(CropType::from_label(" Wheat"), CropType::Other(" Wheat".to_string()));
        assert_eq!(CropType::from_label(""), CropType::Other(String::new()));
        assert!(!CropType::from_label("Barley").is_known());
    }

    #[test]
    fn test_soil_type_with_space() {
        assert_eq!(SoilType::from_label("Sandy Loam"), SoilType::SandyLoam);
        assert_eq!(SoilType::SandyLoam.to_string(), "Sandy Loam");
    }

    #[test]
    fn test_parameters_json_uses_form_field_names() {
        let json = serde_json::to_value(SoilParameters::default()).unwrap();
        assert_eq!(json["pH"], 6.5);
        assert_eq!(json["soilType"], "Clay");
        assert_eq!(json["cropType"], "Wheat");

        let parsed: SoilParameters = serde_json::from_value(serde_json::json!({
            "temperature": 18.0,
            "humidity": 45.0,
            "rainfall": 120.0,
            "nitrogen": 50.0,
            "phosphorus": 25.0,
            "potassium": 30.0,
            "pH": 7.1,
            "soilType": "Peaty",
            "cropType": "Sorghum"
        }))
        .unwrap();
        assert_eq!(parsed.soil_type, SoilType::Peaty);
        assert_eq!(parsed.crop_type, CropType::Other("Sorghum".to_string()));
    }

    #[test]
    fn test_missing_crop_type_is_unspecified() {
        let parsed: SoilParameters = serde_json::from_value(serde_json::json!({
            "temperature": 25.0,
            "humidity": 60.0,
            "rainfall": 100.0,
            "nitrogen": 40.0,
            "phosphorus": 30.0,
            "potassium": 20.0,
            "pH": 6.5,
            "soilType": "Clay"
        }))
        .unwrap();
        assert_eq!(parsed.crop_type, CropType::unspecified());
        assert!(!parsed.crop_type.is_known());
    }

    #[test]
    fn test_unknown_crop_serializes_verbatim() {
        let params = SoilParameters {
            crop_type: CropType::from_label("Sorghum"),
            ..SoilParameters::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["cropType"], "Sorghum");
    }
}

//! Crop Fertilizer Lookup Table
//!
//! Static crop -> fertilizer mapping with a balanced NPK fallback. Every
//! crop label resolves to exactly one record, so resolution never fails.

use super::types::{CropType, FertilizerRecommendation, SoilParameters};

/// A single table row, stored as static text and materialized on lookup
#[derive(Debug, Clone)]
pub struct FertilizerEntry {
    pub name: &'static str,
    pub npk_ratio: &'static str,
    pub application_rate: &'static str,
    pub description: &'static str,
    pub soil_improvement: [&'static str; 3],
}

impl FertilizerEntry {
    pub fn to_recommendation(&self) -> FertilizerRecommendation {
        FertilizerRecommendation {
            name: self.name.to_string(),
            npk_ratio: self.npk_ratio.to_string(),
            application_rate: self.application_rate.to_string(),
            description: self.description.to_string(),
            soil_improvement: self.soil_improvement.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// EMBEDDED TABLE
// Order matches CropType::KNOWN
// ============================================================================

static CROP_FERTILIZERS: [FertilizerEntry; 10] = [
    FertilizerEntry {
        name: "High Nitrogen Wheat Fertilizer",
        npk_ratio: "20-10-10",
        application_rate: "250-300 kg/ha",
        description: "Balanced formula designed for wheat crops, with higher nitrogen content to promote vegetative growth.",
        soil_improvement: ["Improves soil structure", "Enhances water retention", "Promotes beneficial microorganisms"],
    },
    FertilizerEntry {
        name: "Rice Crop Booster",
        npk_ratio: "15-15-15",
        application_rate: "200-250 kg/ha",
        description: "Balanced formula for rice paddies with equal parts nitrogen, phosphorus and potassium.",
        soil_improvement: ["Improves soil fertility", "Reduces waterlogging effects", "Enhances root development"],
    },
    FertilizerEntry {
        name: "Corn Growth Formula",
        npk_ratio: "12-24-12",
        application_rate: "300-350 kg/ha",
        description: "High phosphorus formula to support corn's energy requirements during growth stages.",
        soil_improvement: ["Increases phosphorus availability", "Enhances stalk strength", "Improves drought resistance"],
    },
    FertilizerEntry {
        name: "Legume Enhancer",
        npk_ratio: "3-10-30",
        application_rate: "150-200 kg/ha",
        description: "Low nitrogen, high potassium formula ideal for nitrogen-fixing legumes like soybeans.",
        soil_improvement: ["Promotes nodule formation", "Enhances nitrogen fixation", "Improves root development"],
    },
    FertilizerEntry {
        name: "Cotton Booster",
        npk_ratio: "5-15-15",
        application_rate: "200-250 kg/ha",
        description: "Balanced formula with emphasis on phosphorus and potassium for cotton quality.",
        soil_improvement: ["Improves fiber strength", "Enhances boll development", "Reduces susceptibility to pests"],
    },
    FertilizerEntry {
        name: "Sugarcane Special",
        npk_ratio: "16-16-8",
        application_rate: "350-400 kg/ha",
        description: "High nitrogen and phosphorus formula to support sugarcane's vigorous growth and sugar content.",
        soil_improvement: ["Improves sucrose content", "Enhances stem development", "Increases drought tolerance"],
    },
    FertilizerEntry {
        name: "Tuber Growth Formula",
        npk_ratio: "8-24-24",
        application_rate: "300-350 kg/ha",
        description: "High phosphorus and potassium formula for tuber development and disease resistance.",
        soil_improvement: ["Promotes tuber formation", "Reduces common scab", "Improves storage quality"],
    },
    FertilizerEntry {
        name: "Tomato Fruiting Formula",
        npk_ratio: "4-7-10",
        application_rate: "150-200 kg/ha",
        description: "Low nitrogen, high potassium formula ideal for tomato fruiting stages.",
        soil_improvement: ["Reduces blossom end rot", "Improves fruit quality", "Enhances disease resistance"],
    },
    FertilizerEntry {
        name: "Root Vegetable Enhancer",
        npk_ratio: "5-10-10",
        application_rate: "200-250 kg/ha",
        description: "Balanced formula with lower nitrogen to prevent forking in root vegetables.",
        soil_improvement: ["Improves root development", "Enhances soil structure", "Reduces pest susceptibility"],
    },
    FertilizerEntry {
        name: "Allium Crop Formula",
        npk_ratio: "10-20-20",
        application_rate: "200-250 kg/ha",
        description: "Phosphorus and potassium rich formula for bulb development in onions.",
        soil_improvement: ["Enhances bulb formation", "Improves storage quality", "Reduces bolting tendency"],
    },
];

static DEFAULT_FERTILIZER: FertilizerEntry = FertilizerEntry {
    name: "Balanced NPK Fertilizer",
    npk_ratio: "10-10-10",
    application_rate: "200-300 kg/ha",
    description: "General purpose balanced fertilizer suitable for most crops and soil conditions.",
    soil_improvement: ["Improves overall soil fertility", "Balanced nutrient profile", "Suitable for most crops"],
};

// ============================================================================
// LOOKUP FUNCTIONS
// ============================================================================

/// Table row for a crop; `Other` gets the balanced default
pub fn table_entry(crop: &CropType) -> &'static FertilizerEntry {
    let row = match crop {
        CropType::Wheat => 0,
        CropType::Rice => 1,
        CropType::Corn => 2,
        CropType::Soybean => 3,
        CropType::Cotton => 4,
        CropType::Sugarcane => 5,
        CropType::Potato => 6,
        CropType::Tomato => 7,
        CropType::Carrot => 8,
        CropType::Onion => 9,
        CropType::Other(_) => return &DEFAULT_FERTILIZER,
    };
    &CROP_FERTILIZERS[row]
}

/// The fallback used for any unrecognized crop
pub fn default_recommendation() -> FertilizerRecommendation {
    DEFAULT_FERTILIZER.to_recommendation()
}

pub fn resolve_for_crop(crop: &CropType) -> FertilizerRecommendation {
    table_entry(crop).to_recommendation()
}

/// Resolve the fertilizer recommendation for a parameter set.
///
/// Only the crop type selects the record; the remaining measurements are
/// accepted but do not change the result.
///
/// # Examples
/// ```
/// use soil_sync::recommendation::{resolve_recommendation, CropType, SoilParameters};
///
/// let params = SoilParameters { crop_type: CropType::Rice, ..SoilParameters::default() };
/// assert_eq!(resolve_recommendation(&params).npk_ratio, "15-15-15");
///
/// let params = SoilParameters { crop_type: CropType::from_label("rice"), ..SoilParameters::default() };
/// assert_eq!(resolve_recommendation(&params).name, "Balanced NPK Fertilizer");
/// ```
pub fn resolve_recommendation(params: &SoilParameters) -> FertilizerRecommendation {
    resolve_for_crop(&params.crop_type)
}

/// Every known crop with its recommendation, in form order
pub fn known_recommendations() -> impl Iterator<Item = (CropType, FertilizerRecommendation)> {
    CropType::KNOWN
        .into_iter()
        .map(|crop| {
            let recommendation = resolve_for_crop(&crop);
            (crop, recommendation)
        })
}

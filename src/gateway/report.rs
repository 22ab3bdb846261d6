//! Report Generation Gateway
//!
//! Prompt construction for the text-generation service, parsing of its
//! replies, and the fallback suggestions used when it is unavailable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::inference::Prediction;
use crate::error::{Result, SoilSyncError};
use crate::recommendation::SoilParameters;

/// Suggestions returned when generation fails
pub const FALLBACK_SUGGESTIONS: [&str; 3] = [
    "Monitor soil moisture regularly",
    "Consider weather conditions for application",
    "Consult with local agricultural expert",
];

const MAX_SUGGESTIONS: usize = 3;

/// Body of a report request: measurements plus an optional earlier prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub parameters: SoilParameters,
    #[serde(default)]
    pub prediction: Option<Prediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: String,
}

#[async_trait]
pub trait ReportClient: Send + Sync {
    /// Generate free text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;
}

// ============================================================================
// Prompts
// ============================================================================

pub fn build_report_prompt(params: &SoilParameters, prediction: Option<&Prediction>) -> String {
    let mut lines = vec![
        "Generate a detailed agricultural report based on the following soil parameters:".to_string(),
        String::new(),
        "Soil Parameters:".to_string(),
        format!("- Soil Type: {}", params.soil_type),
        format!("- Crop Type: {}", params.crop_type),
        format!("- pH Level: {}", params.ph),
        format!("- Nitrogen Content: {} mg/kg", params.nitrogen),
        format!("- Phosphorus Content: {} mg/kg", params.phosphorus),
        format!("- Potassium Content: {} mg/kg", params.potassium),
        format!("- Rainfall: {} mm", params.rainfall),
        format!("- Temperature: {}°C", params.temperature),
        format!("- Humidity: {}%", params.humidity),
    ];

    if let Some(p) = prediction {
        lines.push(String::new());
        lines.push(format!("Recommended Fertilizer: {}", p.fertilizer));
        lines.push(format!("Application Rate: {}", p.application_rate));
    }

    lines.push(String::new());
    lines.push("Please provide:".to_string());
    for (i, section) in [
        "Soil Health Analysis",
        "Nutrient Balance Assessment",
        "Environmental Conditions Impact",
        "Fertilizer Recommendations and Application Strategy",
        "Best Practices for Soil Management",
        "Potential Risks and Mitigation Strategies",
    ]
    .iter()
    .enumerate()
    {
        lines.push(format!("{}. {}", i + 1, section));
    }
    lines.push(String::new());
    lines.push(
        "Format the report in a clear, professional structure with headings and bullet points where appropriate."
            .to_string(),
    );

    lines.join("\n")
}

pub fn build_suggestion_prompt(params: &SoilParameters, prediction: &Prediction) -> String {
    format!(
        "Based on these soil parameters:\n\
         pH: {}\n\
         Nitrogen: {} ppm\n\
         Phosphorus: {} ppm\n\
         Potassium: {} ppm\n\
         Rainfall: {} mm\n\
         Temperature: {}°C\n\
         Humidity: {}%\n\
         Crop Type: {}\n\
         \n\
         And the recommended fertilizer: {}\n\
         Application rate: {}\n\
         \n\
         Provide 3 specific, actionable suggestions for optimal fertilizer application and soil management.",
        params.ph,
        params.nitrogen,
        params.phosphorus,
        params.potassium,
        params.rainfall,
        params.temperature,
        params.humidity,
        params.crop_type,
        prediction.fertilizer,
        prediction.application_rate,
    )
}

/// First three non-empty lines of generated text
pub fn parse_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

pub fn fallback_suggestions() -> Vec<String> {
    FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Ask the report service for application suggestions, falling back to
/// the fixed list on any failure or an empty reply
pub async fn suggest_applications(
    client: &dyn ReportClient,
    params: &SoilParameters,
    prediction: &Prediction,
) -> Vec<String> {
    let prompt = build_suggestion_prompt(params, prediction);
    match client.generate(&prompt).await {
        Ok(text) => {
            let suggestions = parse_suggestions(&text);
            if suggestions.is_empty() {
                tracing::warn!("Report service returned no suggestions, using fallback");
                fallback_suggestions()
            } else {
                suggestions
            }
        }
        Err(e) => {
            tracing::warn!("Suggestion generation failed: {}", e);
            fallback_suggestions()
        }
    }
}

/// Pull generated text out of a `generateContent` response.
///
/// A `promptFeedback.blockReason` means the prompt was refused.
pub fn extract_generated_text(body: &Value) -> Result<String> {
    if let Some(reason) = body
        .pointer("/promptFeedback/blockReason")
        .and_then(|v| v.as_str())
    {
        return Err(SoilSyncError::Report(format!(
            "Content generation was blocked ({})",
            reason
        )));
    }

    let text: String = body
        .pointer("/candidates/0/content/parts")
        .and_then(|v| v.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(SoilSyncError::Report("response contained no text".to_string()));
    }
    Ok(text)
}

// ============================================================================
// HTTP client
// ============================================================================

#[cfg(feature = "api")]
pub use http::GeminiReportClient;

#[cfg(feature = "api")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tracing::{debug, error};

    use super::{extract_generated_text, ReportClient};
    use crate::error::{Result, SoilSyncError};

    const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

    /// Generative-language `generateContent` client
    #[derive(Debug, Clone)]
    pub struct GeminiReportClient {
        client: reqwest::Client,
        api_key: String,
        model: String,
    }

    impl GeminiReportClient {
        pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                api_key: api_key.into(),
                model: model.into(),
            }
        }

        fn endpoint(&self) -> String {
            format!("{}/{}:generateContent", API_BASE, self.model)
        }
    }

    #[async_trait]
    impl ReportClient for GeminiReportClient {
        async fn generate(&self, prompt: &str) -> Result<String> {
            debug!(model = %self.model, prompt_len = prompt.len(), "Requesting text generation");

            let response = self
                .client
                .post(self.endpoint())
                .query(&[("key", self.api_key.as_str())])
                .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
                .timeout(Duration::from_secs(60))
                .send()
                .await
                .map_err(|e| {
                    error!(error = %e, "Text generation request failed");
                    SoilSyncError::Report(e.to_string())
                })?;

            let status = response.status();
            if !status.is_success() {
                error!(status = %status, "Text generation service returned an error");
                return Err(SoilSyncError::Report(format!(
                    "text generation service returned {}",
                    status
                )));
            }

            let body: Value = response
                .json()
                .await
                .map_err(|e| SoilSyncError::Report(e.to_string()))?;

            extract_generated_text(&body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedReply(Result<String>);

    #[async_trait]
    impl ReportClient for FixedReply {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(SoilSyncError::Report("unavailable".to_string())),
            }
        }
    }

    fn urea() -> Prediction {
        Prediction {
            fertilizer: "Urea".to_string(),
            application_rate: "120 kg/ha".to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_report_prompt_includes_prediction_when_present() {
        let params = SoilParameters::default();

        let without = build_report_prompt(&params, None);
        assert!(without.contains("- pH Level: 6.5"));
        assert!(without.contains("- Soil Type: Clay"));
        assert!(without.contains("6. Potential Risks and Mitigation Strategies"));
        assert!(!without.contains("Recommended Fertilizer"));

        let with = build_report_prompt(&params, Some(&urea()));
        assert!(with.contains("Recommended Fertilizer: Urea"));
        assert!(with.contains("Application Rate: 120 kg/ha"));
    }

    #[test]
    fn test_suggestion_prompt() {
        let prompt = build_suggestion_prompt(&SoilParameters::default(), &urea());
        assert!(prompt.contains("Crop Type: Wheat"));
        assert!(prompt.contains("And the recommended fertilizer: Urea"));
        assert!(prompt.ends_with("soil management."));
    }

    #[test]
    fn test_parse_suggestions_skips_blank_lines() {
        let text = "1. Split the dose\n\n  2. Irrigate lightly  \n3. Test again in spring\n4. Extra";
        assert_eq!(
            parse_suggestions(text),
            vec!["1. Split the dose", "2. Irrigate lightly", "3. Test again in spring"]
        );
        assert!(parse_suggestions("\n \n").is_empty());
    }

    #[test]
    fn test_extract_generated_text() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "## Soil " }, { "text": "Health" }] } }]
        });
        assert_eq!(extract_generated_text(&body).unwrap(), "## Soil Health");
    }

    #[test]
    fn test_extract_blocked_prompt() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = extract_generated_text(&body).unwrap_err();
        assert!(err.to_string().contains("blocked"));

        assert!(extract_generated_text(&json!({ "candidates": [] })).is_err());
    }

    #[tokio::test]
    async fn test_suggestions_use_reply() {
        let client = FixedReply(Ok("Apply before rain\nUse split doses\nMulch\nMore".to_string()));
        let suggestions = suggest_applications(&client, &SoilParameters::default(), &urea()).await;
        assert_eq!(suggestions, vec!["Apply before rain", "Use split doses", "Mulch"]);
    }

    #[tokio::test]
    async fn test_suggestions_fall_back_on_failure() {
        let failing = FixedReply(Err(SoilSyncError::NotConfigured("report service")));
        let suggestions = suggest_applications(&failing, &SoilParameters::default(), &urea()).await;
        assert_eq!(suggestions, fallback_suggestions());

        let empty = FixedReply(Ok("   \n".to_string()));
        let suggestions = suggest_applications(&empty, &SoilParameters::default(), &urea()).await;
        assert_eq!(suggestions, fallback_suggestions());
    }
}

//! Service configuration from environment variables
//!
//! | Variable         | Default              |
//! |------------------|----------------------|
//! | `PORT`           | 3000                 |
//! | `STORE_PATH`     | unset (memory store) |
//! | `HF_API_URL`     | unset                |
//! | `HF_API_TOKEN`   | unset                |
//! | `GEMINI_API_KEY` | unset                |
//! | `GEMINI_MODEL`   | `gemini-pro`         |
//!
//! The prediction client is only configured when both `HF_API_URL` and
//! `HF_API_TOKEN` are present.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REPORT_MODEL: &str = "gemini-pro";

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub port: u16,
    pub store_path: Option<PathBuf>,
    pub inference: Option<InferenceConfig>,
    pub report: Option<ReportConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store_path: None,
            inference: None,
            report: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = get("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let inference = match (get("HF_API_URL"), get("HF_API_TOKEN")) {
            (Some(url), Some(token)) => Some(InferenceConfig { url, token }),
            _ => None,
        };

        let report = get("GEMINI_API_KEY").map(|api_key| ReportConfig {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_REPORT_MODEL.to_string()),
        });

        Self {
            port,
            store_path: get("STORE_PATH").map(PathBuf::from),
            inference,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServiceConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]), ServiceConfig::default());
    }

    #[test]
    fn test_full_environment() {
        let config = config_from(&[
            ("PORT", "8000"),
            ("STORE_PATH", "/var/lib/soil_sync/store.json"),
            ("HF_API_URL", "https://models.example/fertilizer"),
            ("HF_API_TOKEN", "hf_token"),
            ("GEMINI_API_KEY", "key"),
            ("GEMINI_MODEL", "gemini-1.5-flash"),
        ]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.store_path, Some(PathBuf::from("/var/lib/soil_sync/store.json")));
        assert_eq!(config.inference.unwrap().token, "hf_token");
        assert_eq!(config.report.unwrap().model, "gemini-1.5-flash");
    }

    #[test]
    fn test_partial_inference_config_is_ignored() {
        let config = config_from(&[("HF_API_URL", "https://models.example"), ("HF_API_TOKEN", " ")]);
        assert!(config.inference.is_none());
    }

    #[test]
    fn test_bad_port_and_default_model() {
        let config = config_from(&[("PORT", "not-a-port"), ("GEMINI_API_KEY", "key")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.report.unwrap().model, DEFAULT_REPORT_MODEL);
    }
}

//! Submission Store
//!
//! Keeps the most recent submission (parameters, recommendation, timing)
//! under a fixed key. Saving overwrites whatever was there and also
//! appends to a bounded history that `recent` reads newest first.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::recommendation::{
    advise_timing, resolve_recommendation, FertilizerRecommendation, SoilParameters,
};

/// Key the last submission is stored under
pub const SUBMISSION_KEY: &str = "soilsyncData";

/// Key the submission history is stored under
pub const HISTORY_KEY: &str = "soilsyncHistory";

/// Oldest entries beyond this are dropped on save
pub const HISTORY_CAPACITY: usize = 100;

/// Default page size for `recent`
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// One processed submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub parameters: SoilParameters,
    pub recommendation: FertilizerRecommendation,
    pub application_timing: String,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Run the recommendation engine over a parameter set
    pub fn from_parameters(parameters: SoilParameters) -> Self {
        let recommendation = resolve_recommendation(&parameters);
        let application_timing = advise_timing(parameters.humidity, parameters.temperature).to_string();
        Self {
            parameters,
            recommendation,
            application_timing,
            submitted_at: Utc::now(),
        }
    }
}

pub trait SubmissionStore: Send + Sync {
    /// Replace the stored submission and record it in the history
    fn save(&self, submission: &Submission) -> Result<()>;

    fn load(&self) -> Result<Option<Submission>>;

    /// Drop the current submission. History is kept.
    fn clear(&self) -> Result<()>;

    /// Up to `limit` past submissions, newest first
    fn recent(&self, limit: usize) -> Result<Vec<Submission>>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store, lost on restart
#[derive(Debug, Default)]
pub struct MemorySubmissionStore {
    current: RwLock<Option<Submission>>,
    // Oldest first
    history: RwLock<Vec<Submission>>,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubmissionStore for MemorySubmissionStore {
    fn save(&self, submission: &Submission) -> Result<()> {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(submission.clone());

        let mut history = self.history.write().unwrap_or_else(|e| e.into_inner());
        history.push(submission.clone());
        if history.len() > HISTORY_CAPACITY {
            let excess = history.len() - HISTORY_CAPACITY;
            history.drain(..excess);
        }
        Ok(())
    }

    fn load(&self) -> Result<Option<Submission>> {
        Ok(self.current.read().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn clear(&self) -> Result<()> {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<Submission>> {
        let history = self.history.read().unwrap_or_else(|e| e.into_inner());
        Ok(history.iter().rev().take(limit).cloned().collect())
    }
}

// ============================================================================
// File store
// ============================================================================

/// JSON document on disk holding `{ "<key>": <submission>, "<history key>": [...] }`.
///
/// Other keys in the document are preserved. A missing file reads as
/// empty; a malformed one is an error. History is stored newest first.
#[derive(Debug)]
pub struct FileSubmissionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSubmissionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Write to a sibling then rename so readers never see a partial file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec_pretty(document)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn take_history(document: &mut Map<String, Value>) -> Result<Vec<Submission>> {
        match document.remove(HISTORY_KEY) {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }
}

impl SubmissionStore for FileSubmissionStore {
    fn save(&self, submission: &Submission) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut document = self.read_document()?;

        let mut history = Self::take_history(&mut document)?;
        history.insert(0, submission.clone());
        history.truncate(HISTORY_CAPACITY);

        document.insert(SUBMISSION_KEY.to_string(), serde_json::to_value(submission)?);
        document.insert(HISTORY_KEY.to_string(), serde_json::to_value(&history)?);
        self.write_document(&document)?;
        tracing::debug!("Saved submission to {} ({} in history)", self.path.display(), history.len());
        Ok(())
    }

    fn load(&self) -> Result<Option<Submission>> {
        let mut document = self.read_document()?;
        match document.remove(SUBMISSION_KEY) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut document = self.read_document()?;
        if document.remove(SUBMISSION_KEY).is_some() {
            self.write_document(&document)?;
            tracing::debug!("Cleared submission in {}", self.path.display());
        }
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<Submission>> {
        let mut document = self.read_document()?;
        let mut history = Self::take_history(&mut document)?;
        history.truncate(limit);
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SoilSyncError;
    use crate::recommendation::CropType;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("soil_sync_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("store.json")
    }

    fn submission(crop: CropType) -> Submission {
        Submission::from_parameters(SoilParameters {
            crop_type: crop,
            ..SoilParameters::default()
        })
    }

    #[test]
    fn test_submission_runs_engine() {
        let sub = submission(CropType::Corn);
        assert_eq!(sub.recommendation.name, "Corn Growth Formula");
        assert_eq!(
            sub.application_timing,
            "Current conditions are suitable for fertilizer application"
        );
    }

    #[test]
    fn test_memory_store_overwrites_and_clears() {
        let store = MemorySubmissionStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&submission(CropType::Wheat)).unwrap();
        let second = submission(CropType::Onion);
        store.save(&second).unwrap();
        assert_eq!(store.load().unwrap(), Some(second));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_recent_is_newest_first() {
        let store = MemorySubmissionStore::new();
        assert!(store.recent(DEFAULT_RECENT_LIMIT).unwrap().is_empty());

        for crop in [CropType::Wheat, CropType::Rice, CropType::Corn] {
            store.save(&submission(crop)).unwrap();
        }
        store.clear().unwrap();

        let crops: Vec<CropType> = store
            .recent(DEFAULT_RECENT_LIMIT)
            .unwrap()
            .into_iter()
            .map(|s| s.parameters.crop_type)
            .collect();
        assert_eq!(crops, vec![CropType::Corn, CropType::Rice, CropType::Wheat]);
        assert_eq!(store.recent(2).unwrap().len(), 2);
        assert!(store.recent(0).unwrap().is_empty());
    }

    #[test]
    fn test_memory_history_is_bounded() {
        let store = MemorySubmissionStore::new();
        for _ in 0..HISTORY_CAPACITY + 5 {
            store.save(&submission(CropType::Potato)).unwrap();
        }
        store.save(&submission(CropType::Carrot)).unwrap();

        let all = store.recent(usize::MAX).unwrap();
        assert_eq!(all.len(), HISTORY_CAPACITY);
        assert_eq!(all[0].parameters.crop_type, CropType::Carrot);
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path("round_trip");
        let store = FileSubmissionStore::new(&path);
        assert!(store.load().unwrap().is_none());

        let sub = submission(CropType::Tomato);
        store.save(&sub).unwrap();

        // A fresh handle sees the same data
        let reopened = FileSubmissionStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(sub));

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[SUBMISSION_KEY]["parameters"]["cropType"], "Tomato");

        reopened.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_recent_survives_reopen() {
        let path = temp_path("history");
        let store = FileSubmissionStore::new(&path);
        assert!(store.recent(DEFAULT_RECENT_LIMIT).unwrap().is_empty());

        store.save(&submission(CropType::Soybean)).unwrap();
        store.save(&submission(CropType::Cotton)).unwrap();
        store.clear().unwrap();

        let reopened = FileSubmissionStore::new(&path);
        let recent = reopened.recent(DEFAULT_RECENT_LIMIT).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].parameters.crop_type, CropType::Cotton);
        assert_eq!(recent[1].parameters.crop_type, CropType::Soybean);
        assert_eq!(reopened.recent(1).unwrap().len(), 1);
        assert!(reopened.load().unwrap().is_none());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_keeps_unrelated_keys() {
        let path = temp_path("other_keys");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"soilsync-theme": "dark"}"#).unwrap();

        let store = FileSubmissionStore::new(&path);
        store.save(&submission(CropType::Rice)).unwrap();
        store.clear().unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["soilsync-theme"], "dark");
        assert!(raw.get(SUBMISSION_KEY).is_none());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_malformed_document() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let store = FileSubmissionStore::new(&path);
        assert!(matches!(store.load(), Err(SoilSyncError::Serialization(_))));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}

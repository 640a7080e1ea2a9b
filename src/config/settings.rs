//! Settings structures for settly configuration

use crate::error::FetchError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main settings structure matching settly.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub api: ApiSettings,
    pub search: SearchSettings,
    pub storage: StorageSettings,
    /// File the settings were read from (none = defaults)
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut settings: Settings = serde_yaml::from_str(&content)?;
        settings.source = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Merge with environment variables (SETTLY_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("SETTLY_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("SETTLY_API_BASE_URL") {
            self.api.base_url = val;
        }
        if let Ok(val) = std::env::var("SETTLY_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse() {
                self.search.debounce_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("SETTLY_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(val));
        }
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the settly REST API
    pub base_url: String,
    /// Path of the suggestion endpoint
    pub suggest_path: String,
    /// Path of the explore endpoint
    pub explore_path: String,
    /// Prefix of the per-suburb report endpoints
    pub reports_path: String,
    /// Name of the free-text query parameter
    pub query_param: String,
    /// Timeout applied by the HTTP client to every request (seconds)
    pub request_timeout_secs: Option<f64>,
    /// Timeout for a single suggestion fetch (seconds)
    pub suggest_timeout_secs: Option<f64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            suggest_path: "/api/suburbs/suggestions".to_string(),
            explore_path: "/api/suburbs/explore".to_string(),
            reports_path: "/api/suburbs".to_string(),
            query_param: "q".to_string(),
            request_timeout_secs: None,
            suggest_timeout_secs: None,
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Result<Option<Duration>, FetchError> {
        seconds(self.request_timeout_secs)
    }

    pub fn suggest_timeout(&self) -> Result<Option<Duration>, FetchError> {
        seconds(self.suggest_timeout_secs)
    }
}

fn seconds(value: Option<f64>) -> Result<Option<Duration>, FetchError> {
    value
        .map(|secs| Duration::try_from_secs_f64(secs).map_err(|_| FetchError::InvalidTimeout(secs)))
        .transpose()
}

/// Typeahead behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period before a query is fetched (milliseconds)
    pub debounce_ms: u64,
    /// Queries shorter than this (after trimming) are never fetched
    pub min_query_len: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
            min_query_len: crate::MIN_QUERY_LEN,
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Persistent storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage file (none = platform data directory)
    pub path: Option<PathBuf>,
}

impl StorageSettings {
    /// Resolve the storage file location
    pub fn resolve_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("settly")
                .join("storage.json")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.search.debounce_ms, 300);
        assert_eq!(settings.search.min_query_len, 3);
        assert!(!settings.general.debug);
        assert!(settings.api.suggest_timeout().unwrap().is_none());
    }

    #[test]
    fn test_timeouts_from_yaml() {
        let yaml = "api:\n  suggest_timeout_secs: 2.5\n  request_timeout_secs: -1\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            settings.api.suggest_timeout().unwrap(),
            Some(Duration::from_millis(2500))
        );
        assert!(matches!(
            settings.api.request_timeout(),
            Err(FetchError::InvalidTimeout(secs)) if secs == -1.0
        ));

        let nan = ApiSettings {
            suggest_timeout_secs: Some(f64::NAN),
            ..ApiSettings::default()
        };
        assert!(nan.suggest_timeout().is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "api:\n  base_url: https://api.settly.example\nsearch:\n  debounce_ms: 150\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(settings.api.base_url, "https://api.settly.example");
        assert_eq!(settings.api.query_param, "q");
        assert_eq!(settings.search.debounce(), Duration::from_millis(150));
        assert_eq!(settings.search.min_query_len, 3);
    }

    #[test]
    fn test_explicit_storage_path() {
        let storage = StorageSettings {
            path: Some(PathBuf::from("/tmp/settly.json")),
        };
        assert_eq!(storage.resolve_path(), PathBuf::from("/tmp/settly.json"));
    }
}

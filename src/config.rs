//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TICKETS_COLLECTION: &str = "tickets";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Web API key of the Firebase project
    pub firebase_api_key: Option<String>,
    /// Project id used for Firestore document paths
    pub firebase_project_id: Option<String>,
    /// Endpoint receiving URL-encoded ID requests
    pub id_request_url: Option<String>,
    /// Endpoint receiving JSON contact messages
    pub contact_url: Option<String>,
    /// Collection receiving support tickets
    pub tickets_collection: Option<String>,
    /// Google ID token exchanged for a session on federated sign-in
    pub google_id_token: Option<String>,
    /// Route path shown at startup
    pub start_route: Option<String>,
    /// HTTP timeout for every outbound request
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("ph", "citimax", "intake-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Where the refresh token of the last session is kept
    pub fn session_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("session.json"))
    }

    /// Load configuration from file, then apply environment overrides.
    ///
    /// On first run an empty template is written for the user to fill in.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if !path.exists() => {
                let config = Self::default();
                if let Err(e) = config.save() {
                    tracing::debug!("Could not write config template: {e}");
                }
                config
            }
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Override values from `INTAKE_*` variables
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let text = |key: &str, slot: &mut Option<String>| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        };
        text("INTAKE_FIREBASE_API_KEY", &mut self.firebase_api_key);
        text("INTAKE_FIREBASE_PROJECT_ID", &mut self.firebase_project_id);
        text("INTAKE_ID_REQUEST_URL", &mut self.id_request_url);
        text("INTAKE_CONTACT_URL", &mut self.contact_url);
        text("INTAKE_TICKETS_COLLECTION", &mut self.tickets_collection);
        text("INTAKE_GOOGLE_ID_TOKEN", &mut self.google_id_token);
        text("INTAKE_START_ROUTE", &mut self.start_route);

        match lookup("INTAKE_REQUEST_TIMEOUT_SECS").map(|v| v.parse::<u64>()) {
            Some(Ok(0)) => tracing::warn!("Ignoring INTAKE_REQUEST_TIMEOUT_SECS: must be positive"),
            Some(Ok(secs)) => self.request_timeout_secs = Some(secs),
            Some(Err(e)) => tracing::warn!("Ignoring INTAKE_REQUEST_TIMEOUT_SECS: {e}"),
            None => {}
        }
    }

    pub fn tickets_collection(&self) -> &str {
        self.tickets_collection
            .as_deref()
            .unwrap_or(DEFAULT_TICKETS_COLLECTION)
    }

    pub fn id_request_url(&self) -> &str {
        self.id_request_url.as_deref().unwrap_or_default()
    }

    pub fn contact_url(&self) -> &str {
        self.contact_url.as_deref().unwrap_or_default()
    }

    pub fn start_route(&self) -> &str {
        self.start_route.as_deref().unwrap_or("/")
    }

    /// A zero timeout would fail every request, so it falls back to the default
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.firebase_api_key.is_none());
        assert_eq!(config.tickets_collection(), "tickets");
        assert_eq!(config.id_request_url(), "");
        assert_eq!(config.start_route(), "/");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_serialization() {
        let config = AppConfig {
            contact_url: Some("https://forms.example/contact".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.contact_url(), "https://forms.example/contact");
        assert!(parsed.id_request_url.is_none());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"tickets_collection": "support", "unknown_field": "value"}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.tickets_collection(), "support");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("INTAKE_FIREBASE_API_KEY", "key-from-env"),
            ("INTAKE_REQUEST_TIMEOUT_SECS", "5"),
            ("INTAKE_CONTACT_URL", ""),
        ]);
        let mut config = AppConfig {
            firebase_api_key: Some("key-from-file".to_string()),
            contact_url: Some("https://forms.example/contact".to_string()),
            ..Default::default()
        };

        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.firebase_api_key.as_deref(), Some("key-from-env"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        // Empty variables do not clear configured values
        assert_eq!(config.contact_url(), "https://forms.example/contact");
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(|key| {
            (key == "INTAKE_REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(config.request_timeout_secs.is_none());
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let mut config = AppConfig::default();
        config.apply_env(|key| (key == "INTAKE_REQUEST_TIMEOUT_SECS").then(|| "0".to_string()));
        assert!(config.request_timeout_secs.is_none());

        let from_file: AppConfig = serde_json::from_str(r#"{"request_timeout_secs": 0}"#).unwrap();
        assert_eq!(from_file.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            firebase_project_id: Some("citimax-helpdesk".to_string()),
            start_route: Some("/contact".to_string()),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_returns_default_when_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("missing.json")).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_paths_return_option() {
        // Just test that the functions don't panic
        let _config = AppConfig::config_path();
        let _session = AppConfig::session_path();
    }
}

//! Dispatch settings and validation.
//!
//! All fields are optional so a settings file may set only what it needs;
//! the `effective_*` accessors supply defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::SandboxRealm;

/// Default cap on autocomplete suggestions.
pub const DEFAULT_MAX_COMPLETIONS: u32 = 25;

/// Dispatch settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Match command names and aliases regardless of case.
    pub case_insensitive_lookup: Option<bool>,

    /// Include hidden commands in listings and autocomplete.
    pub show_hidden: Option<bool>,

    /// Realm this process executes commands in.
    pub host_realm: Option<SandboxRealm>,

    /// Maximum autocomplete suggestions returned (1-200).
    pub max_completions: Option<u32>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            case_insensitive_lookup: Some(true),
            show_hidden: Some(false),
            host_realm: Some(SandboxRealm::Server),
            max_completions: Some(DEFAULT_MAX_COMPLETIONS),
        }
    }

    #[must_use]
    pub fn effective_case_insensitive_lookup(&self) -> bool {
        self.case_insensitive_lookup.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_show_hidden(&self) -> bool {
        self.show_hidden.unwrap_or(false)
    }

    #[must_use]
    pub fn effective_host_realm(&self) -> SandboxRealm {
        self.host_realm.unwrap_or_default()
    }

    #[must_use]
    pub fn effective_max_completions(&self) -> usize {
        self.max_completions.unwrap_or(DEFAULT_MAX_COMPLETIONS) as usize
    }
}

/// Settings validation or loading error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Max completions must be between 1 and 200, got {0}")]
    InvalidCompletionLimit(u32),

    #[error("Failed to read settings file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse settings file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(limit) = settings.max_completions {
        if !(1..=200).contains(&limit) {
            return Err(SettingsError::InvalidCompletionLimit(limit));
        }
    }

    Ok(())
}

/// Load and validate settings from a JSON file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let raw = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let settings: Settings = serde_json::from_str(&raw).map_err(|e| SettingsError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    validate_settings(&settings)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.case_insensitive_lookup, Some(true));
        assert_eq!(settings.show_hidden, Some(false));
        assert_eq!(settings.host_realm, Some(SandboxRealm::Server));
        assert_eq!(settings.max_completions, Some(DEFAULT_MAX_COMPLETIONS));
    }

    #[test]
    fn test_validate_settings_valid() {
        assert!(validate_settings(&Settings::with_defaults()).is_ok());
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_validate_completion_limit_zero() {
        let settings = Settings {
            max_completions: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidCompletionLimit(0))
        ));
    }

    #[test]
    fn test_validate_completion_limit_too_large() {
        let settings = Settings {
            max_completions: Some(500),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidCompletionLimit(500))
        ));
    }

    #[test]
    fn test_effective_values_without_fields() {
        let settings = Settings::default();
        assert!(settings.effective_case_insensitive_lookup());
        assert!(!settings.effective_show_hidden());
        assert_eq!(settings.effective_host_realm(), SandboxRealm::Server);
        assert_eq!(settings.effective_max_completions(), 25);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"host_realm": "client", "show_hidden": true}}"#).unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.effective_host_realm(), SandboxRealm::Client);
        assert!(settings.effective_show_hidden());
        assert_eq!(settings.case_insensitive_lookup, None);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_completions": 0}}"#).unwrap();
        assert!(matches!(
            load_settings(file.path()),
            Err(SettingsError::InvalidCompletionLimit(0))
        ));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_settings(file.path()),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_settings(&dir.path().join("absent.json")),
            Err(SettingsError::Io { .. })
        ));
    }
}

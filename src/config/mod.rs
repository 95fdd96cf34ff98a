use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::selector::person::{default_candidates, validate_candidates, Person};

fn default_dropdown_min_width() -> u16 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// People offered in the dropdown
    #[serde(default = "default_candidates")]
    pub candidates: Vec<Person>,

    /// Minimum dropdown width in cells
    #[serde(default = "default_dropdown_min_width")]
    pub dropdown_min_width: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            dropdown_min_width: default_dropdown_min_width(),
        }
    }
}

/// A people file only needs the `[[candidates]]` table
#[derive(Debug, Deserialize)]
struct PeopleFile {
    candidates: Vec<Person>,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chipbox").join("config.toml"))
    }

    /// Load config from the user config dir. Never fails: anything unusable
    /// is logged and replaced with defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        validate_candidates(&config.candidates)?;
        Ok(config)
    }

    /// Replace the candidates with the ones listed in a people file
    pub fn with_people_file(mut self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read people file {}", path.display()))?;
        let people: PeopleFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse people file {}", path.display()))?;
        validate_candidates(&people.candidates)
            .with_context(|| format!("Invalid people file {}", path.display()))?;

        tracing::info!("Loaded {} candidates from {}", people.candidates.len(), path.display());
        self.candidates = people.candidates;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Write a TOML file into the temp dir and return its path
    fn write_toml(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = tmp.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_config_defaults_when_fields_missing() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.candidates, default_candidates());
        assert_eq!(config.dropdown_min_width, 30);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            candidates: vec![Person::new("Ada Lovelace", "ada@example.com")],
            dropdown_min_width: 40,
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.candidates, deserialized.candidates);
        assert_eq!(config.dropdown_min_width, deserialized.dropdown_min_width);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_toml(
            &tmp,
            "config.toml",
            r#"
dropdown_min_width = 44

[[candidates]]
name = "Grace Hopper"
email = "grace@example.com"
"#,
        );

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.dropdown_min_width, 44);
        assert_eq!(config.candidates, vec![Person::new("Grace Hopper", "grace@example.com")]);
    }

    #[test]
    fn test_people_file_replaces_candidates() {
        let tmp = TempDir::new().unwrap();
        let path = write_toml(
            &tmp,
            "people.toml",
            r#"
[[candidates]]
name = "Ada Lovelace"
email = "ada@example.com"

[[candidates]]
name = "Alan Turing"
email = "alan@example.com"
"#,
        );

        let config = AppConfig::default().with_people_file(&path).unwrap();
        assert_eq!(config.candidates.len(), 2);
        assert_eq!(config.candidates[1].name, "Alan Turing");
    }

    #[test]
    fn test_people_file_with_duplicates_fails() {
        let tmp = TempDir::new().unwrap();
        let path = write_toml(
            &tmp,
            "dupes.toml",
            r#"
[[candidates]]
name = "Ada"
email = "ada@example.com"

[[candidates]]
name = "Ada Again"
email = "ada@example.com"
"#,
        );

        let err = AppConfig::default().with_people_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate candidate email"));
    }

    #[test]
    fn test_missing_people_file_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.toml");
        assert!(AppConfig::default().with_people_file(&path).is_err());
    }
}

//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/redraft/config.toml)
//! 3. Environment variables (REDRAFT_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "REDRAFT";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (activity log database)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Site name passed to schema generation (optional)
    #[serde(default)]
    pub site_name: Option<String>,

    /// Whether to auto-generate a schema draft when none was inserted
    #[serde(default)]
    pub auto_schema: bool,

    /// Entity types accepted in generated schema
    #[serde(default = "default_accepted_entities")]
    pub accepted_entities: Vec<String>,

    /// Content-quality scoring endpoint (optional)
    #[serde(default)]
    pub scorer_url: Option<String>,

    /// Schema generation endpoint (optional)
    #[serde(default)]
    pub schema_generator_url: Option<String>,

    /// Schema validation endpoint (optional)
    #[serde(default)]
    pub schema_validator_url: Option<String>,

    /// Publishing target endpoint (optional)
    #[serde(default)]
    pub publisher_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            site_name: None,
            auto_schema: false,
            accepted_entities: default_accepted_entities(),
            scorer_url: None,
            schema_generator_url: None,
            schema_validator_url: None,
            publisher_url: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (REDRAFT_DATA_DIR, REDRAFT_SCORER_URL, ...)
    /// 2. Config file (~/.config/redraft/config.toml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_SITE_NAME", ENV_PREFIX)) {
            self.site_name = if val.is_empty() { None } else { Some(val) };
        }

        if let Ok(val) = std::env::var(format!("{}_AUTO_SCHEMA", ENV_PREFIX)) {
            self.auto_schema = val.eq_ignore_ascii_case("true") || val == "1";
        }

        for (var, field) in [
            ("SCORER_URL", &mut self.scorer_url),
            ("SCHEMA_GENERATOR_URL", &mut self.schema_generator_url),
            ("SCHEMA_VALIDATOR_URL", &mut self.schema_validator_url),
            ("PUBLISHER_URL", &mut self.publisher_url),
        ] {
            if let Ok(val) = std::env::var(format!("{}_{}", ENV_PREFIX, var)) {
                *field = if val.is_empty() { None } else { Some(val) };
            }
        }
    }

    /// Save configuration to the default file location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Path to the config file
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("redraft")
            .join("config.toml")
    }

    /// Path to the activity log database
    pub fn activity_db_path(&self) -> PathBuf {
        self.data_dir.join("activity.db")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("redraft")
}

fn default_accepted_entities() -> Vec<String> {
    vec!["Article".to_string(), "FAQPage".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.auto_schema);
        assert!(config.scorer_url.is_none());
        assert_eq!(config.accepted_entities, vec!["Article", "FAQPage"]);
    }

    #[test]
    fn test_load_from_str() {
        let config = Config::load_from_str(
            r#"
            site_name = "Example Site"
            auto_schema = true
            scorer_url = "https://api.example.com/score"
            accepted_entities = ["Article"]
            "#,
        )
        .unwrap();

        assert_eq!(config.site_name.as_deref(), Some("Example Site"));
        assert!(config.auto_schema);
        assert_eq!(
            config.scorer_url.as_deref(),
            Some("https://api.example.com/score")
        );
        assert_eq!(config.accepted_entities, vec!["Article"]);
    }

    #[test]
    fn test_load_from_missing_path_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert!(!config.auto_schema);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.site_name = Some("Round Trip".to_string());
        config.publisher_url = Some("https://cms.example.com/publish".to_string());
        config.save_to_path(&path).unwrap();

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded.site_name.as_deref(), Some("Round Trip"));
        assert_eq!(
            reloaded.publisher_url.as_deref(),
            Some("https://cms.example.com/publish")
        );
    }

    #[test]
    fn test_activity_db_path() {
        let mut config = Config::default();
        config.data_dir = PathBuf::from("/tmp/redraft-test");
        assert_eq!(
            config.activity_db_path(),
            PathBuf::from("/tmp/redraft-test/activity.db")
        );
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::load_from_str("site_name = [not toml").is_err());
    }
}

//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse JSON/TOML configuration documents
//! - Apply defaults for every omitted key
//! - Validate configuration legality
//! - Generate `RelaySettings`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let settings = ConfigLoader::load_from_path(Path::new("config/settings.json")).unwrap();
//! println!("Strategy: {}", settings.output_strategy);
//! ```

mod parser;
mod validator;

pub use contracts::RelaySettings;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.json / .toml).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<RelaySettings, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<RelaySettings, ContractError> {
        Self::parse_and_validate(content, format)
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        std::fs::read_to_string(path).map_err(|e| ContractError::ConfigParse {
            message: format!("cannot read '{}': {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<RelaySettings, ContractError> {
        let settings = parser::parse(content, format)?;
        validator::validate(&settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SETTINGS_JSON: &str = r#"{
        "dataset_url": "https://data.example.org/fire_incidents.csv",
        "max_rows": 100,
        "output_strategy": "console",
        "output_config": {
            "console": {},
            "kafka": { "bootstrap_servers": "localhost:9092", "topic": "fire_incidents" },
            "redis": { "host": "localhost", "port": 6379, "db": 0, "key_prefix": "fire_incident:" }
        }
    }"#;

    #[test]
    fn test_load_from_str_json() {
        let result = ConfigLoader::load_from_str(SETTINGS_JSON, ConfigFormat::Json);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let settings = result.unwrap();
        assert_eq!(settings.output_strategy, "console");
        assert_eq!(settings.output_config.store.key_prefix, "fire_incident:");
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(SETTINGS_JSON.as_bytes()).unwrap();

        let settings = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(settings.max_rows, 100);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ConfigLoader::load_from_path(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(err.is_config_error(), "got: {err}");
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"{ "max_rows": 0 }"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Json);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("max_rows"));
    }
}

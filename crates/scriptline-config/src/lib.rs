use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Document setting queried by the exporter to decide whether notes are printed.
pub const SETTING_PRINT_NOTES: &str = "printNotes";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Opaque per-document key/value store supplied by the host.
///
/// The parser only ever asks for specific named values; everything else is
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSettings(BTreeMap<String, toml::Value>);

impl DocumentSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(toml::Value::as_bool)
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(toml::Value::as_integer)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(toml::Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<toml::Value> {
        self.0.remove(key)
    }
}

/// Host context consumed by the parser: numbering, printing and the
/// per-session list of line types the host has switched off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub print_scene_numbers: bool,
    pub scene_numbering_starts_from: usize,
    /// Line type names (snake_case, e.g. `"synopsis"`) excluded from printing.
    pub disabled_types: Vec<String>,
    pub document_settings: DocumentSettings,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            print_scene_numbers: true,
            scene_numbering_starts_from: 1,
            disabled_types: Vec::new(),
            document_settings: DocumentSettings::default(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/scriptline");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/scriptline/config.toml"));
    }

    #[test]
    fn test_parser_config_defaults() {
        let config = ParserConfig::default();

        assert!(config.print_scene_numbers);
        assert_eq!(config.scene_numbering_starts_from, 1);
        assert!(config.disabled_types.is_empty());
        assert_eq!(config.document_settings, DocumentSettings::new());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config_content = r#"
[parser]
scene_numbering_starts_from = 10
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.parser.scene_numbering_starts_from, 10);
        assert!(config.parser.print_scene_numbers);
    }

    #[test]
    fn test_document_settings_from_toml() {
        let config_content = r#"
[parser]
disabled_types = ["synopsis", "section"]

[parser.document_settings]
printNotes = true
revisionLevel = 2
heading = "bold"
"#;

        let config: Config = toml::from_str(config_content).unwrap();
        let settings = &config.parser.document_settings;

        assert_eq!(config.parser.disabled_types, vec!["synopsis", "section"]);
        assert_eq!(settings.get_bool(SETTING_PRINT_NOTES), Some(true));
        assert_eq!(settings.get_integer("revisionLevel"), Some(2));
        assert_eq!(settings.get_string("heading"), Some("bold"));
        assert_eq!(settings.get_bool("missing"), None);
    }

    #[test]
    fn test_document_settings_typed_getters_reject_mismatched_types() {
        let mut settings = DocumentSettings::new();
        settings.set(SETTING_PRINT_NOTES, "yes");

        assert_eq!(settings.get_bool(SETTING_PRINT_NOTES), None);
        assert_eq!(settings.get_string(SETTING_PRINT_NOTES), Some("yes"));

        settings.remove(SETTING_PRINT_NOTES);
        assert!(settings.get(SETTING_PRINT_NOTES).is_none());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[parser\nbroken").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config::default();
        test_config.parser.print_scene_numbers = false;
        test_config.parser.scene_numbering_starts_from = 5;
        test_config
            .parser
            .document_settings
            .set(SETTING_PRINT_NOTES, true);

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config.parser, test_config.parser);
    }
}

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::mapping::types::MappingRule;

/// Default log level when neither the config file nor `LSP_SETTINGS_LOG` set one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "LSP_SETTINGS_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub log_level: String,
    /// Statically declared language server definitions
    pub definitions: Vec<StaticDefinitionConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            definitions: Vec::new(),
        }
    }
}

/// A statically declared definition and the mappings it registers
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StaticDefinitionConfig {
    pub id: String,
    /// Display name, the id is used when empty
    pub name: String,
    pub mappings: Vec<MappingRuleConfig>,
}

/// Mapping declaration; exactly one of `language`, `fileType`, `fileNamePatterns` is expected
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingRuleConfig {
    pub language: Option<String>,
    pub file_type: Option<String>,
    pub file_name_patterns: Option<Vec<String>>,
    pub language_id: String,
}

impl From<MappingRuleConfig> for MappingRule {
    fn from(config: MappingRuleConfig) -> Self {
        let criteria_count = [
            config.language.is_some(),
            config.file_type.is_some(),
            config.file_name_patterns.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count();
        if criteria_count > 1 {
            warn!(
                "Mapping for language id '{}' declares {} criteria, keeping the first",
                config.language_id, criteria_count
            );
        }

        if let Some(language) = config.language {
            MappingRule::language(language, config.language_id)
        } else if let Some(file_type) = config.file_type {
            MappingRule::file_type(file_type, config.language_id)
        } else if let Some(patterns) = config.file_name_patterns {
            MappingRule::file_name_patterns(patterns, config.language_id)
        } else {
            MappingRule {
                criterion: None,
                language_id: config.language_id,
            }
        }
    }
}

/// Load the configuration file, falling back to defaults when it does not exist
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the path to the data directory for lsp-settings.
/// Uses $XDG_DATA_HOME/lsp-settings if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/lsp-settings,
/// or ./lsp-settings if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the database file.
pub fn db_path() -> PathBuf {
    data_dir().join("settings.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("lsp-settings.log")
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("lsp-settings")
}

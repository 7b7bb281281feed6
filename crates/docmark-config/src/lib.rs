use docmark_engine::CompileOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

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

    #[error("Invalid start_index {value} in {config_path}: document offsets start at 1")]
    InvalidStartIndex { config_path: PathBuf, value: usize },

    #[error("Invalid max_batch_size {value} in {config_path}: must be at least 1")]
    InvalidBatchSize { config_path: PathBuf, value: usize },
}

/// Compiler and batching defaults, overridable per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub start_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
    pub title_for_first_h1: bool,
    pub max_batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_index: 1,
            tab_id: None,
            title_for_first_h1: false,
            max_batch_size: 50,
        }
    }
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

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand environment variables in the tab id, e.g. `tab_id = "$DOCMARK_TAB"`
        config.tab_id = config
            .tab_id
            .map(|tab| Self::expand_env(&tab).unwrap_or(tab));

        config.validate(config_path)?;
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/docmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Options for a compile call using these defaults.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            start_index: self.start_index,
            tab_id: self.tab_id.clone(),
            title_for_first_h1: self.title_for_first_h1,
        }
    }

    fn validate(&self, config_path: &Path) -> Result<(), ConfigError> {
        if self.start_index == 0 {
            return Err(ConfigError::InvalidStartIndex {
                config_path: config_path.to_path_buf(),
                value: self.start_index,
            });
        }
        if self.max_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize {
                config_path: config_path.to_path_buf(),
                value: self.max_batch_size,
            });
        }
        Ok(())
    }

    fn expand_env(value: &str) -> Option<String> {
        match shellexpand::env(value) {
            Ok(expanded) => Some(expanded.into_owned()),
            Err(_) => None,
        }
    }
}

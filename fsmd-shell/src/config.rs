//! Shell configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via FSMD_CONFIG or --config)
//! 3. Environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Shell configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interactive shell settings.
    pub shell: ShellConfig,
    /// Diagnostics and session log settings.
    pub log: LogConfig,
    /// Snapshot storage settings.
    pub storage: StorageConfig,
}

impl Config {
    /// Loads configuration from `path`, or from FSMD_CONFIG when no path is
    /// given, then applies environment variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match std::env::var("FSMD_CONFIG") {
                Ok(path) => Self::from_file(path)?,
                Err(_) => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.shell.apply_env_overrides();
        self.log.apply_env_overrides();
        self.storage.apply_env_overrides();
    }

    /// Checks values that would otherwise fail later at start-up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shell.prompt.is_empty() {
            return Err(ConfigError::ValidationError(
                "shell.prompt must not be empty".to_string(),
            ));
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "log.level must not be empty".to_string(),
            ));
        }
        if self.storage.snapshot_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.snapshot_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Saves configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        Ok(())
    }
}

/// Interactive shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt shown before each interactive line.
    pub prompt: String,
    /// History file. Defaults to `~/.fsmd_history`.
    pub history_file: Option<PathBuf>,
    /// Whether output is colored.
    pub color: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "? ".to_string(),
            history_file: None,
            color: true,
        }
    }
}

impl ShellConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(prompt) = std::env::var("FSMD_PROMPT") {
            self.prompt = prompt;
        }

        if let Ok(path) = std::env::var("FSMD_HISTORY") {
            self.history_file = Some(PathBuf::from(path));
        }

        if let Ok(color) = std::env::var("FSMD_COLOR") {
            self.color = color == "1" || color.to_lowercase() == "true";
        }
    }

    /// Returns the history file path, falling back to the home directory.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| home::home_dir().map(|h| h.join(".fsmd_history")))
    }
}

/// Diagnostics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default tracing filter when RUST_LOG is unset.
    pub level: String,
    /// Session log started at launch, as if by `LOG <file>`.
    pub session_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            session_file: None,
        }
    }
}

impl LogConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("FSMD_LOG_LEVEL") {
            self.level = level;
        }

        if let Ok(path) = std::env::var("FSMD_SESSION_LOG") {
            self.session_file = Some(PathBuf::from(path));
        }
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory relative snapshot names resolve against.
    pub snapshot_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("."),
        }
    }
}

impl StorageConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("FSMD_SNAPSHOT_DIR") {
            self.snapshot_dir = PathBuf::from(dir);
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

//! Application configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::games::guess::GameRules;

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "strictly_guess.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Game rules for every session.
    rules: GameRules,
    /// Terminal shell settings.
    shell: ShellConfig,
}

/// Settings for the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Deserialize, new)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Milliseconds per countdown tick.
    tick_millis: u64,
    /// Where `play` mode writes its log.
    log_file: PathBuf,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::new(1000, PathBuf::from("strictly_guess.log"))
    }
}

impl ShellConfig {
    /// Tick interval as a duration. Zero is bumped to one millisecond.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }
}

impl AppConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(
            seconds = config.rules.seconds(),
            attempts = config.rules.attempts(),
            tick_millis = config.shell.tick_millis,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else defaults.
    ///
    /// An explicit path that does not exist is an error.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

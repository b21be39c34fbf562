use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Window size used when a config file omits it
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// What happens to a window once it has filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Ring buffer: records age out one at a time, rates always cover the last `capacity` records
    #[default]
    Wrap,
    /// Aggregates and records are cleared, the next window starts empty
    Reset,
}

/// Where the window-complete handler runs relative to the context lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackDispatch {
    /// Inside the critical section, borrowing the live window
    #[default]
    Locked,
    /// After the lock is released, on a copy of the completed window
    ///
    /// Each copy holds exactly the records of one completion, but handlers
    /// for successive windows may run in parallel on different threads and
    /// finish in any order. Handlers that need ordering can sort on record
    /// ids. The handler may call back into the context.
    Snapshot,
}

/// When committed records are written to the sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogMode {
    /// One line per heartbeat
    #[default]
    PerHeartbeat,
    /// The whole window, once per completion
    PerWindow,
    /// Only on explicit `log_window()` calls
    Off,
}

/// Settings for one heartbeat context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub policy: WindowPolicy,
    #[serde(default)]
    pub dispatch: CallbackDispatch,
    #[serde(default)]
    pub log_mode: LogMode,
    /// Emit the sink's column header when the context is built
    #[serde(default)]
    pub write_header: bool,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ContextConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: WindowPolicy::default(),
            dispatch: CallbackDispatch::default(),
            log_mode: LogMode::default(),
            write_header: false,
        }
    }

    /// Load configuration from YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        Self::from_yaml_str(&yaml_content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: ContextConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

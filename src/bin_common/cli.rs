//! CLI utilities for binaries
//!
//! Handles configuration loading and environment variables
//! for all binary executables.

use anyhow::Context;
use heartbeats::ContextConfig;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Heartbeat context configuration (config/heartbeat.yaml)
    Context,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Context => "config/heartbeat.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Get the environment variable name for this config type
    pub fn env_var_name(&self) -> &str {
        "HEARTBEAT_CONFIG_PATH"
    }
}

/// Load configuration path from environment or use default
///
/// A `Custom` path always wins over the environment.
///
/// # Examples
/// ```
/// use heartbeat_monitor::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::Custom("my.yaml".to_string()));
/// assert_eq!(path.to_str(), Some("my.yaml"));
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    if let ConfigType::Custom(path) = &config_type {
        return PathBuf::from(path);
    }
    std::env::var(config_type.env_var_name())
        .unwrap_or_else(|_| config_type.default_path().to_string())
        .into()
}

/// Load a context config, falling back to defaults when the file does not exist
///
/// A file that exists but does not parse or validate is an error.
pub fn load_context_config(path: &Path) -> anyhow::Result<ContextConfig> {
    if !path.exists() {
        warn!("Config {} not found, using defaults", path.display());
        return Ok(ContextConfig::default());
    }

    let config = ContextConfig::load(path)
        .with_context(|| format!("loading heartbeat config from {}", path.display()))?;
    info!("Loaded heartbeat config from {}", path.display());
    Ok(config)
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

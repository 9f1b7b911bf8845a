//! # Runtime Configuration
//!
//! Every option is optional and has a default. Values come, in increasing
//! precedence, from built-in defaults, an optional YAML file named by
//! `RUNTIME_CONFIG_FILE`, and `RUNTIME_*` environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use function_runtime::config::RuntimeConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RuntimeConfig::load()?;
//! let descriptor = config.source_descriptor()?;
//! let settings = config.dispatch_settings();
//! println!("polling {} every {:?}", settings.input_channel, settings.poll_interval);
//! # let _ = descriptor;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

pub use error::{ConfigError, ConfigResult};

use crate::dispatch::DispatchSettings;
use crate::loader::{SourceDescriptor, SourceKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable prefix for every option
pub const ENV_PREFIX: &str = "RUNTIME";

/// Environment variable naming an optional configuration file
pub const CONFIG_FILE_VAR: &str = "RUNTIME_CONFIG_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Channel store host
    pub redis_host: String,
    /// Channel store port
    pub redis_port: u16,
    /// Key polled for events
    pub input_channel: String,
    /// Key written with results
    pub output_channel: String,
    /// Tick period in seconds
    pub poll_interval: u64,
    /// `file` or `archive` (`zip` is accepted as an alias)
    pub source_type: String,
    /// Function module used when the source type is `file`
    pub script_path: PathBuf,
    /// Archive used when the source type is `archive`
    pub zip_path: PathBuf,
    /// Entry module inside the archive
    pub zip_entry: String,
    /// Function bound from the loaded module
    pub function_name: String,
    /// Root for archive scratch workspaces; system temp dir when unset
    pub scratch_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            input_channel: "events".to_string(),
            output_channel: "results".to_string(),
            poll_interval: 5,
            source_type: "file".to_string(),
            script_path: PathBuf::from("/code/function.yaml"),
            zip_path: PathBuf::from("/code/function.zip"),
            zip_entry: "function.yaml".to_string(),
            function_name: "handler".to_string(),
            scratch_dir: None,
        }
    }
}

impl RuntimeConfig {
    /// Load from the process environment
    pub fn load() -> ConfigResult<Self> {
        loader::load_from_process_env()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.redis_host.trim().is_empty() {
            return Err(ConfigError::missing_required_field(
                "redis_host",
                "channel store configuration",
            ));
        }

        if self.redis_port == 0 {
            return Err(ConfigError::invalid_value(
                "redis_port",
                "0",
                "port must be greater than 0",
            ));
        }

        if self.input_channel.is_empty() {
            return Err(ConfigError::missing_required_field(
                "input_channel",
                "channel configuration",
            ));
        }

        if self.output_channel.is_empty() {
            return Err(ConfigError::missing_required_field(
                "output_channel",
                "channel configuration",
            ));
        }

        if self.poll_interval == 0 {
            return Err(ConfigError::invalid_value(
                "poll_interval",
                "0",
                "poll interval must be at least 1 second",
            ));
        }

        if self.function_name.is_empty() {
            return Err(ConfigError::missing_required_field(
                "function_name",
                "handler configuration",
            ));
        }

        let kind = self.source_kind()?;
        if kind == SourceKind::Archive && self.zip_entry.is_empty() {
            return Err(ConfigError::missing_required_field(
                "zip_entry",
                "archive source configuration",
            ));
        }

        Ok(())
    }

    pub fn source_kind(&self) -> ConfigResult<SourceKind> {
        self.source_type.parse().map_err(|reason: String| {
            ConfigError::invalid_value("source_type", &self.source_type, reason)
        })
    }

    /// Describe the handler source selected by `source_type`
    pub fn source_descriptor(&self) -> ConfigResult<SourceDescriptor> {
        Ok(match self.source_kind()? {
            SourceKind::File => SourceDescriptor::file(&self.script_path, &self.function_name),
            SourceKind::Archive => {
                SourceDescriptor::archive(&self.zip_path, &self.zip_entry, &self.function_name)
            }
        })
    }

    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            input_channel: self.input_channel.clone(),
            output_channel: self.output_channel.clone(),
            poll_interval: self.poll_interval_duration(),
        }
    }
}

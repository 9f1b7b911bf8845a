//! # Configuration Loader
//!
//! Layers an optional YAML file and `RUNTIME_*` environment variables over the
//! built-in defaults using the `config` crate, then validates the result.

use super::error::ConfigResult;
use super::{RuntimeConfig, CONFIG_FILE_VAR, ENV_PREFIX};
use ::config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load from the real process environment
pub fn load_from_process_env() -> ConfigResult<RuntimeConfig> {
    let config_file = std::env::var(CONFIG_FILE_VAR).ok().map(PathBuf::from);
    load(Environment::with_prefix(ENV_PREFIX), config_file.as_deref())
}

/// Load from an explicit variable map instead of the process environment
///
/// Keys are full variable names such as `RUNTIME_INPUT_CHANNEL`. Useful for
/// tests, which must not race on the shared process environment.
pub fn load_from_vars(vars: HashMap<String, String>) -> ConfigResult<RuntimeConfig> {
    let config_file = vars.get(CONFIG_FILE_VAR).map(PathBuf::from);
    load(
        Environment::with_prefix(ENV_PREFIX).source(Some(vars)),
        config_file.as_deref(),
    )
}

fn load(environment: Environment, config_file: Option<&Path>) -> ConfigResult<RuntimeConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_file {
        debug!(path = %path.display(), "Loading runtime configuration file");
        builder = builder.add_source(File::from(path).required(true));
    }

    let config: RuntimeConfig = builder
        .add_source(environment)
        .build()?
        .try_deserialize()?;

    config.validate()?;

    debug!(
        redis_host = %config.redis_host,
        redis_port = config.redis_port,
        input_channel = %config.input_channel,
        output_channel = %config.output_channel,
        poll_interval = config.poll_interval,
        source_type = %config.source_type,
        function_name = %config.function_name,
        "Runtime configuration loaded"
    );

    Ok(config)
}

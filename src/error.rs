//! # Runtime Error Taxonomy
//!
//! Startup-fatal conditions surface as [`RuntimeError`]. Steady-state
//! conditions (decode failures, handler failures, non-mapping results, store
//! hiccups) never leave the dispatch loop; they are reported as
//! [`crate::dispatch::TickOutcome`] values instead.

use crate::config::ConfigError;
use crate::loader::LoadError;
use crate::messaging::StoreError;
use crate::registry::RegistryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The channel store could not be reached during the startup check.
    #[error("Connectivity error: {0}")]
    Connectivity(#[source] StoreError),

    /// The handler could not be resolved from its source.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Configuration was missing, malformed or failed validation.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The built-in handler classes could not be registered.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl RuntimeError {
    /// Short machine-friendly label for the `kind` field of startup failure logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::Connectivity(_) => "connectivity",
            RuntimeError::Load(_) => "load",
            RuntimeError::Configuration(_) => "configuration",
            RuntimeError::Registry(_) => "registry",
        }
    }

    /// Label of the first `RuntimeError` in an error chain, `"unknown"` when there is none
    pub fn kind_of(err: &anyhow::Error) -> &'static str {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<RuntimeError>())
            .map_or("unknown", RuntimeError::kind)
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

//! # Execution Context
//!
//! The state container handed to every handler invocation for the lifetime of
//! the process. `config` is fixed at load time; `env` belongs to the handler
//! and is the only place it may carry state from one call to the next.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionContext {
    config: Map<String, Value>,

    /// Handler-owned state. The runtime never reads or writes it.
    pub env: Map<String, Value>,

    created_at: DateTime<Utc>,
    invocations: u64,
}

impl ExecutionContext {
    /// Create a context with the given immutable configuration and an empty `env`
    pub fn new(config: Map<String, Value>) -> Self {
        Self {
            config,
            env: Map::new(),
            created_at: Utc::now(),
            invocations: 0,
        }
    }

    pub fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    /// Look up a single configuration value
    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Number of invocations started with this context, including the current one
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    pub(crate) fn begin_invocation(&mut self) -> u64 {
        self.invocations += 1;
        self.invocations
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(Map::new())
    }
}

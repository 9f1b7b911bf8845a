//! # Built-in Handlers
//!
//! Handler classes compiled into the runtime binary. Function modules select
//! them by class name:
//!
//! - `system_metrics` - host metrics summary with running CPU averages
//! - `echo` - publishes the event unchanged

pub mod system_metrics;

pub use system_metrics::SystemMetricsHandler;

use crate::execution::{ExecutionContext, FunctionHandler, HandlerError};
use crate::registry::{HandlerRegistry, RegistryError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Returns the event unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

#[async_trait]
impl FunctionHandler for EchoHandler {
    async fn invoke(
        &self,
        event: &Value,
        _context: &mut ExecutionContext,
    ) -> Result<Value, HandlerError> {
        Ok(event.clone())
    }

    fn handler_name(&self) -> &'static str {
        "echo"
    }
}

/// Register every built-in handler class
pub fn register_builtins(registry: &mut HandlerRegistry) -> Result<(), RegistryError> {
    registry.register(
        "system_metrics",
        "Network egress, memory caching and running CPU averages",
        |config| Ok(Arc::new(SystemMetricsHandler::from_config(config)?) as Arc<dyn FunctionHandler>),
    )?;
    registry.register("echo", "Publishes the event unchanged", |_config| {
        Ok(Arc::new(EchoHandler) as Arc<dyn FunctionHandler>)
    })?;
    Ok(())
}

/// A registry holding only the built-in handler classes
pub fn builtin_registry() -> Result<HandlerRegistry, RegistryError> {
    let mut registry = HandlerRegistry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}

//! # Function Handler Contract
//!
//! Defines the capability that user functions implement and the bound form
//! the loader hands to the dispatch loop.

use crate::execution::context::ExecutionContext;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a handler, either at bind time or during an invocation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandlerError {
    #[error("Invalid event: {message}")]
    InvalidEvent { message: String },

    #[error("Invalid handler configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Handler execution failed: {message}")]
    Execution { message: String },

    #[error("Handler panicked: {message}")]
    Panicked { message: String },
}

impl HandlerError {
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    pub fn panicked(message: impl Into<String>) -> Self {
        Self::Panicked {
            message: message.into(),
        }
    }
}

/// Trait for user-supplied functions
///
/// Implementations are registered with a [`crate::registry::HandlerRegistry`]
/// under a handler class name and selected at startup by a function module.
#[async_trait]
pub trait FunctionHandler: Send + Sync {
    /// Handle one event
    ///
    /// # Arguments
    ///
    /// * `event` - The decoded event, usually a JSON object
    /// * `context` - The process-lifetime execution context; state kept in
    ///   `context.env` is visible to the next invocation
    ///
    /// # Returns
    ///
    /// * `Ok(Value::Object)` - Published to the output channel
    /// * `Ok(_)` - Any other value is discarded by the runtime
    /// * `Err` - Logged; the event is not retried
    async fn invoke(
        &self,
        event: &Value,
        context: &mut ExecutionContext,
    ) -> Result<Value, HandlerError>;

    /// Validate the handler configuration before the handler is bound
    ///
    /// Default implementation accepts all configurations.
    fn validate_config(&self, config: &Map<String, Value>) -> Result<(), HandlerError> {
        let _ = config;
        Ok(())
    }

    /// Handler name for logging
    fn handler_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A handler resolved from a function source, ready to be invoked
#[derive(Clone)]
pub struct BoundHandler {
    /// Name of the function the module exported
    pub function_name: String,
    /// Registry class the function was bound to
    pub handler_class: String,
    /// Handler configuration; seeds [`ExecutionContext::config`]
    pub config: Map<String, Value>,
    handler: Arc<dyn FunctionHandler>,
}

impl BoundHandler {
    pub fn new(
        function_name: impl Into<String>,
        handler_class: impl Into<String>,
        config: Map<String, Value>,
        handler: Arc<dyn FunctionHandler>,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            handler_class: handler_class.into(),
            config,
            handler,
        }
    }

    /// Bind a handler directly, without going through a function source
    pub fn from_handler(function_name: impl Into<String>, handler: Arc<dyn FunctionHandler>) -> Self {
        let handler_class = handler.handler_name().to_string();
        Self::new(function_name, handler_class, Map::new(), handler)
    }

    pub fn handler(&self) -> &Arc<dyn FunctionHandler> {
        &self.handler
    }

    /// Build the execution context this handler starts with
    pub fn new_context(&self) -> ExecutionContext {
        ExecutionContext::new(self.config.clone())
    }
}

impl std::fmt::Debug for BoundHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundHandler")
            .field("function_name", &self.function_name)
            .field("handler_class", &self.handler_class)
            .field("config", &self.config)
            .finish()
    }
}

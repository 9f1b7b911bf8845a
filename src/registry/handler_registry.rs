//! # Handler Registry
//!
//! Compile-time plugin interface: handler classes are registered by name with
//! a factory, and function modules select one of them at startup.
//!
//! ## Usage
//!
//! ```rust
//! use function_runtime::execution::FunctionHandler;
//! use function_runtime::handlers::SystemMetricsHandler;
//! use function_runtime::registry::HandlerRegistry;
//! use std::sync::Arc;
//!
//! let mut registry = HandlerRegistry::new();
//! registry
//!     .register("system_metrics", "Host metrics summary", |_config| {
//!         Ok(Arc::new(SystemMetricsHandler::default()) as Arc<dyn FunctionHandler>)
//!     })
//!     .expect("first registration");
//! assert!(registry.contains("system_metrics"));
//! ```

use crate::execution::{FunctionHandler, HandlerError};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Factory producing a handler from its module-level configuration
pub type HandlerFactory = Arc<
    dyn Fn(&Map<String, Value>) -> Result<Arc<dyn FunctionHandler>, HandlerError> + Send + Sync,
>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Handler class already registered: {class}")]
    DuplicateClass { class: String },

    #[error("Invalid handler class name: {class:?}: {reason}")]
    InvalidClassName { class: String, reason: String },
}

/// A registered handler class
#[derive(Clone)]
pub struct RegisteredHandler {
    pub class: String,
    pub description: String,
    factory: HandlerFactory,
}

impl RegisteredHandler {
    /// Run the factory; this is the single load-time side effect of a handler
    pub fn instantiate(
        &self,
        config: &Map<String, Value>,
    ) -> Result<Arc<dyn FunctionHandler>, HandlerError> {
        (self.factory)(config)
    }
}

impl std::fmt::Debug for RegisteredHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredHandler")
            .field("class", &self.class)
            .field("description", &self.description)
            .finish()
    }
}

/// Registry of handler classes available to function modules
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, RegisteredHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler class
    pub fn register<F>(
        &mut self,
        class: &str,
        description: &str,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&Map<String, Value>) -> Result<Arc<dyn FunctionHandler>, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        Self::validate_class_name(class)?;

        if self.handlers.contains_key(class) {
            return Err(RegistryError::DuplicateClass {
                class: class.to_string(),
            });
        }

        self.handlers.insert(
            class.to_string(),
            RegisteredHandler {
                class: class.to_string(),
                description: description.to_string(),
                factory: Arc::new(factory),
            },
        );

        debug!(class = %class, "📚 Registered handler class");
        Ok(())
    }

    pub fn get(&self, class: &str) -> Option<&RegisteredHandler> {
        self.handlers.get(class)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.handlers.contains_key(class)
    }

    /// Registered class names, sorted
    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self.handlers.keys().cloned().collect();
        classes.sort();
        classes
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn validate_class_name(class: &str) -> Result<(), RegistryError> {
        if class.is_empty() {
            return Err(RegistryError::InvalidClassName {
                class: class.to_string(),
                reason: "name cannot be empty".to_string(),
            });
        }

        if !class
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
        {
            return Err(RegistryError::InvalidClassName {
                class: class.to_string(),
                reason: "only ASCII letters, digits, '_', '-', '.' and ':' are allowed"
                    .to_string(),
            });
        }

        Ok(())
    }
}

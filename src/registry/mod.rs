//! # Registry Infrastructure
//!
//! Handler classes compiled into the runtime and resolvable by name.

pub mod handler_registry;

pub use handler_registry::{HandlerFactory, HandlerRegistry, RegisteredHandler, RegistryError};

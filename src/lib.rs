#![allow(clippy::doc_markdown)] // Allow technical terms like Redis, YAML in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Function Runtime
//!
//! Minimal function-execution runtime: loads a single user handler and drives
//! it from a polled key/value channel.
//!
//! ## Overview
//!
//! A deployment describes one function in a YAML function module. The module
//! names a compiled-in handler class and its configuration; the loader resolves
//! it (from a plain file or from an entry inside a zip archive) into a bound
//! handler. The dispatcher then polls an input key, skips events equal to the
//! last one seen, invokes the handler with a persistent execution context and
//! publishes mapping results to an output key.
//!
//! ## Module Organization
//!
//! - [`config`] - Environment and file driven runtime configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Top-level startup errors
//! - [`messaging`] - Channel store abstraction with Redis and in-memory backends
//! - [`execution`] - Handler contract and execution context
//! - [`registry`] - Handler class registry
//! - [`loader`] - Function module resolution from files and archives
//! - [`dispatch`] - Polling dispatch loop with change detection
//! - [`handlers`] - Built-in handler classes
//! - [`bootstrap`] - Startup sequence
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use function_runtime::{bootstrap, handlers, RuntimeConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RuntimeConfig::load()?;
//! let registry = Arc::new(handlers::builtin_registry()?);
//!
//! let mut dispatcher = bootstrap::start(&config, registry).await?;
//! dispatcher.run().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! Everything above the store is generic over [`messaging::ChannelStore`], so
//! tests drive the dispatcher with [`messaging::InMemoryChannelStore`] and call
//! [`dispatch::Dispatcher::tick`] directly instead of waiting on the poll timer.

pub mod bootstrap;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod execution;
pub mod handlers;
pub mod loader;
pub mod logging;
pub mod messaging;
pub mod registry;

pub use config::{ConfigError, RuntimeConfig};
pub use dispatch::{DispatchSettings, Dispatcher, TickOutcome};
pub use error::{Result, RuntimeError};
pub use execution::{BoundHandler, ExecutionContext, FunctionHandler, HandlerError};
pub use loader::{HandlerLoader, LoadError, SourceDescriptor, SourceKind};
pub use messaging::{ChannelStore, InMemoryChannelStore, RedisChannelStore, StoreError};
pub use registry::HandlerRegistry;

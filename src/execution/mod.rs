//! # Execution Module
//!
//! The handler contract and the context threaded through every invocation.

pub mod context;
pub mod handler;

pub use context::ExecutionContext;
pub use handler::{BoundHandler, FunctionHandler, HandlerError};

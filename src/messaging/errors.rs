//! # Channel Store Error Types
//!
//! Structured error handling for channel store access using thiserror
//! instead of `Box<dyn Error>` patterns.

use thiserror::Error;

/// Channel store error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store connection error: {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    #[error("Store command failed: {operation} {key}: {message}")]
    Command {
        operation: String,
        key: String,
        message: String,
    },

    #[error("Unexpected ping reply: {reply}")]
    UnexpectedPing { reply: String },

    #[error("Invalid store endpoint: {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

impl StoreError {
    /// Create a connection error
    pub fn connection(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a command error for a single key operation
    pub fn command(
        operation: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Command {
            operation: operation.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an unexpected ping reply error
    pub fn unexpected_ping(reply: impl Into<String>) -> Self {
        Self::UnexpectedPing {
            reply: reply.into(),
        }
    }

    /// Create an invalid endpoint error
    pub fn invalid_endpoint(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Whether the error indicates the store itself is unreachable
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            StoreError::Connection { .. } | StoreError::InvalidEndpoint { .. }
        )
    }
}

/// Result type alias for channel store operations
pub type StoreResult<T> = Result<T, StoreError>;

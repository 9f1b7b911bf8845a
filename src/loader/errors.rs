//! # Load Error Types
//!
//! Every way resolving a handler from its source can fail. All of them are
//! fatal to startup.

use crate::execution::HandlerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Function source not found: {path}")]
    SourceNotFound { path: String },

    #[error("Failed to read archive {path}: {message}")]
    Archive { path: String, message: String },

    #[error("Entry file '{entry}' not found in archive {archive}")]
    EntryNotFound { entry: String, archive: String },

    #[error("Invalid entry file name '{entry}': {reason}")]
    InvalidEntryPath { entry: String, reason: String },

    #[error("Failed to parse function module {origin}: {message}")]
    ModuleParse { origin: String, message: String },

    #[error("Function '{function}' not defined in {origin}")]
    FunctionNotDefined { function: String, origin: String },

    #[error("Function '{function}' names unknown handler class '{class}' (registered: {registered})")]
    UnknownHandlerClass {
        function: String,
        class: String,
        registered: String,
    },

    #[error("Handler class '{class}' rejected function '{function}': {source}")]
    ContractViolation {
        function: String,
        class: String,
        #[source]
        source: HandlerError,
    },

    #[error("Scratch workspace error: {message}")]
    ScratchWorkspace { message: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl LoadError {
    pub fn source_not_found(path: impl Into<String>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    pub fn archive(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn entry_not_found(entry: impl Into<String>, archive: impl Into<String>) -> Self {
        Self::EntryNotFound {
            entry: entry.into(),
            archive: archive.into(),
        }
    }

    pub fn invalid_entry_path(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntryPath {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    pub fn module_parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModuleParse {
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn function_not_defined(function: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::FunctionNotDefined {
            function: function.into(),
            origin: origin.into(),
        }
    }

    pub fn unknown_handler_class(
        function: impl Into<String>,
        class: impl Into<String>,
        registered: &[String],
    ) -> Self {
        Self::UnknownHandlerClass {
            function: function.into(),
            class: class.into(),
            registered: if registered.is_empty() {
                "none".to_string()
            } else {
                registered.join(", ")
            },
        }
    }

    pub fn contract_violation(
        function: impl Into<String>,
        class: impl Into<String>,
        source: HandlerError,
    ) -> Self {
        Self::ContractViolation {
            function: function.into(),
            class: class.into(),
            source,
        }
    }

    pub fn scratch_workspace(message: impl Into<String>) -> Self {
        Self::ScratchWorkspace {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

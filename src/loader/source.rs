//! # Source Descriptors
//!
//! Where a handler comes from: a loose function module on disk, or a zip
//! archive with a declared entry module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Archive,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(SourceKind::File),
            "archive" | "zip" => Ok(SourceKind::Archive),
            other => Err(format!(
                "invalid source type '{other}': must be 'file' or 'archive'"
            )),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Archive => write!(f, "archive"),
        }
    }
}

/// Immutable description of the handler to bind at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    File {
        path: PathBuf,
        function_name: String,
    },
    Archive {
        path: PathBuf,
        entry_file: String,
        function_name: String,
    },
}

impl SourceDescriptor {
    pub fn file(path: impl Into<PathBuf>, function_name: impl Into<String>) -> Self {
        Self::File {
            path: path.into(),
            function_name: function_name.into(),
        }
    }

    pub fn archive(
        path: impl Into<PathBuf>,
        entry_file: impl Into<String>,
        function_name: impl Into<String>,
    ) -> Self {
        Self::Archive {
            path: path.into(),
            entry_file: entry_file.into(),
            function_name: function_name.into(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceDescriptor::File { .. } => SourceKind::File,
            SourceDescriptor::Archive { .. } => SourceKind::Archive,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SourceDescriptor::File { path, .. } | SourceDescriptor::Archive { path, .. } => path,
        }
    }

    pub fn function_name(&self) -> &str {
        match self {
            SourceDescriptor::File { function_name, .. }
            | SourceDescriptor::Archive { function_name, .. } => function_name,
        }
    }
}

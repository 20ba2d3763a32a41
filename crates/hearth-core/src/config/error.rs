//! Error types for the configuration store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the structured store.
///
/// Only `Parse` and `Io` come from disk; the rest are lookup failures
/// on an already-loaded store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An existing config file could not be parsed.
    #[error("failed to parse config file {} at line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A file system operation failed.
    #[error("I/O error accessing config at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Strict lookup of an option that is not set.
    #[error("option '{key}' not found in section '{section}'")]
    NotFound { section: String, key: String },

    /// Strict lookup of a section that does not exist.
    #[error("section '{section}' not found")]
    SectionNotFound { section: String },

    /// An option holds a value of a different type than requested.
    #[error("option '{key}' is {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the lookup failures (`NotFound`, `SectionNotFound`).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::SectionNotFound { .. })
    }
}

/// Parse failure inside a text buffer, before a file path is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn at(self, path: impl Into<PathBuf>) -> StoreError {
        StoreError::Parse {
            path: path.into(),
            line: self.line,
            message: self.message,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for SyntaxError {}

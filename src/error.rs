//! Error types and handling infrastructure for rpager.
//!
//! This module provides a centralized error type using `thiserror`. The binary wraps it
//! with `anyhow` for top-level reporting.
//!
//! ## Error classes
//!
//! - **Content I/O failures** are fatal: they stop the reactor and end the process.
//! - **Pattern errors** come from user input and are shown on the status line.
//! - **No match** is not an error at all; it is reported as a status message.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rpager operations.
#[derive(Error, Debug)]
pub enum PagerError {
    /// File system related errors (read or stat failure, permission denied, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found specifically (common case for user feedback)
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path exists but is not a regular file
    #[error("Path is not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Compression format detection or decompression errors
    #[error("Compression error: {message}")]
    CompressionError { message: String },

    /// A user supplied regular expression failed to compile
    #[error("Invalid pattern: {message}")]
    PatternError { message: String },

    /// Terminal setup, teardown or write failures
    #[error("Terminal operation failed: {message}")]
    TerminalError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for rpager operations.
pub type Result<T> = std::result::Result<T, PagerError>;

impl PagerError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a CompressionError with a descriptive message
    pub fn compression(message: impl Into<String>) -> Self {
        Self::CompressionError {
            message: message.into(),
        }
    }

    /// Create a PatternError with a descriptive message
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::PatternError {
            message: message.into(),
        }
    }

    /// Create a TerminalError from an io::Error with additional context
    pub fn terminal(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::TerminalError {
            message: message.into(),
            source,
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for PagerError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_display_messages() {
        let path = PathBuf::from("/test/file.log");

        let file_not_found = PagerError::FileNotFound { path: path.clone() };
        assert_eq!(file_not_found.to_string(), "File not found: /test/file.log");

        let not_a_file = PagerError::NotAFile { path };
        assert_eq!(
            not_a_file.to_string(),
            "Path is not a regular file: /test/file.log"
        );

        let pattern = PagerError::pattern("unclosed group");
        assert_eq!(pattern.to_string(), "Invalid pattern: unclosed group");
    }

    #[test]
    fn error_constructors() {
        assert!(matches!(
            PagerError::compression("bad header"),
            PagerError::CompressionError { .. }
        ));
        assert!(matches!(
            PagerError::config("bad toml"),
            PagerError::ConfigError { .. }
        ));
        assert!(matches!(
            PagerError::other("Unknown error"),
            PagerError::Other { .. }
        ));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let pager_err: PagerError = io_err.into();

        match pager_err {
            PagerError::FileError { message, .. } => {
                assert_eq!(message, "File not found");
            }
            _ => panic!("Expected FileError variant"),
        }
    }

    #[test]
    fn terminal_error_keeps_source() {
        use std::error::Error as _;
        let err = PagerError::terminal(
            "write failed",
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"),
        );
        assert!(err.source().is_some());
    }
}

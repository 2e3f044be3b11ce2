// ============================================================================
// nextpix-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types
//
// This module defines the error type shared by the nextpix-core library.
// Per-file failures during a batch are NOT reported through this type; they
// are converted into a `JobOutcome` by the worker. `CoreError` covers the
// failures that happen outside of a single job: invalid parameters, missing
// dependencies, unreadable input directories and process plumbing errors
// that a `ProcessRunner` reports to its caller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the nextpix-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A child process could not be started at all.
    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    /// A child process was started but waiting on it failed.
    #[error("Failed to wait for '{0}': {1}")]
    CommandWait(String, #[source] std::io::Error),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Path error: {0}")]
    PathError(String),

    #[error("No processable image files found in {}", .0.display())]
    NoFilesFound(PathBuf),

    #[error("Required tool not found: {0}")]
    DependencyNotFound(String),

    #[error("Batch worker thread panicked")]
    WorkerPanicked,

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for nextpix-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CoreError::CommandStart` for the given program.
pub fn command_start_error(program: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(program.into(), err)
}

/// Builds a `CoreError::CommandWait` for the given program.
pub fn command_wait_error(program: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(program.into(), err)
}

/// Builds a `CoreError::InvalidParameter`.
pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> CoreError {
    CoreError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

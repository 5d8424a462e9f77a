//! Error types for the Leadline domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum. Profile updates have no
//! error type at all: every patch is accepted as-is.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for the `leadline` binary.
///
/// Library crates return their bounded-context error; commands roll them up
/// here with `?`.
#[derive(Debug, Error)]
pub enum Error {
    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- I/O ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing resource could not be read, created, or replaced.
    #[error("Lead store at {path} is not accessible: {reason}")]
    Persistence { path: PathBuf, reason: String },

    /// The backing resource exists but does not hold a record sequence.
    /// `commit` recovers from this by starting a fresh sequence.
    #[error("Lead store at {path} holds malformed data: {reason}")]
    MalformedData { path: PathBuf, reason: String },

    #[error("Timed out after {waited_ms}ms waiting for exclusive access to {path}")]
    LockTimeout { path: PathBuf, waited_ms: u64 },
}

impl StoreError {
    /// Whether prior data was lost or unreadable, as opposed to the store
    /// being unreachable.
    pub fn is_malformed(&self) -> bool {
        matches!(self, StoreError::MalformedData { .. })
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

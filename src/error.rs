//! Error types
//!
//! None of these are fatal: the session rejects, logs, or falls back and stays usable.

use thiserror::Error;

/// Rejected player action. State is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A guess key or value outside A-Z (and not the clear marker)
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No puzzle at this index
    #[error("no puzzle at index {0}")]
    UnknownPuzzle(usize),
    /// Puzzle exists but has not been unlocked yet
    #[error("puzzle {0} is locked")]
    Locked(u32),
}

/// Failure talking to the durable key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a persisted snapshot could not be used.
///
/// Every variant means the same thing to the session: start fresh.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("no saved session")]
    NotFound,
    #[error("saved session is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("saved session is not a JSON object")]
    NotAnObject,
    #[error("saved session points at puzzle {index} but only {count} exist")]
    IndexOutOfRange { index: u64, count: usize },
}

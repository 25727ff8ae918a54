//! Error types for configuration, persistence and the template callback.
//!
//! Errors are split by the stage at which they surface:
//!
//! - [`ConfigError`] is raised while a configuration block is parsed and
//!   aborts provisioning of that counter.
//! - [`SnapshotReadError`] is raised while the snapshot is read; the store
//!   recovers from it by starting empty.
//! - [`PersistenceError`] is raised while the snapshot is written and is
//!   reported to the caller of the increment through [`IncrementError`].
//!
//! [`HitCounterError`] wraps all caller-visible errors so the template
//! callback has a single error type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A property was given without its argument.
    #[error("line {line}: missing argument for '{property}'")]
    MissingArgument { property: String, line: usize },

    /// A property was given more than one argument.
    #[error("line {line}: too many arguments for '{property}'")]
    TooManyArguments { property: String, line: usize },

    /// A property name the counter does not know.
    #[error("line {line}: unknown property '{property}'")]
    UnknownProperty { property: String, line: usize },

    /// The seed is not a non-negative integer that fits in 64 bits.
    #[error("line {line}: invalid initial seed value '{value}': {reason}")]
    InvalidInitialSeed {
        value: String,
        reason: String,
        line: usize,
    },

    /// The pad width is not an integer.
    #[error("line {line}: invalid pad_digits value '{value}': {reason}")]
    InvalidPadDigits {
        value: String,
        reason: String,
        line: usize,
    },

    /// Malformed block structure.
    #[error("line {line}: {message}")]
    Syntax { message: String, line: usize },

    /// Error decoding the JSON form of the configuration.
    #[error("json config error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error reading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotReadError {
    /// No snapshot has been written yet.
    #[error("snapshot {0} does not exist")]
    NotFound(PathBuf),

    /// The snapshot exists but could not be read.
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The snapshot was read but is not a valid key to count mapping.
    #[error("failed to decode snapshot {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Error writing a snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Error encoding the mapping to JSON.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Error writing or replacing the snapshot file.
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An increment whose result could not be persisted.
///
/// The in-memory count has already been updated; `count` is the value the
/// caller would have received on success.
#[derive(Debug, Error)]
#[error("counter incremented to {count} but not persisted: {source}")]
pub struct IncrementError {
    /// The new in-memory value.
    pub count: u64,
    /// Why the write failed.
    #[source]
    pub source: PersistenceError,
}

/// Unified error type for the hit counter.
#[derive(Debug, Error)]
pub enum HitCounterError {
    /// Error from configuration parsing.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error persisting an increment.
    #[error(transparent)]
    Increment(#[from] IncrementError),
}

/// Result type for hit counter operations.
pub type Result<T> = std::result::Result<T, HitCounterError>;

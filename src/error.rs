//! Error types for datrie.

use thiserror::Error;

/// Error type for datrie operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Construction failed
    #[error("build failed: {0}")]
    Build(#[from] BuildError),

    /// Byte buffer is not a whole number of units
    #[error("invalid buffer length: {len} bytes is not a multiple of {unit_size}")]
    InvalidLength { len: usize, unit_size: usize },

    /// Requested window lies outside the file
    #[error("window out of range: offset {offset} + size {size} exceeds file length {file_len}")]
    OutOfRange {
        offset: usize,
        size: usize,
        file_len: usize,
    },

    /// Structural validation of a restored array failed
    #[error("corrupted double array at unit {index}: {reason}")]
    Corrupted { index: usize, reason: &'static str },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed dictionary line
    #[error("dictionary line {line}: {message}")]
    Dictionary { line: usize, message: String },
}

/// Result type alias for datrie operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for trie construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Keys are not in ascending byte order
    #[error("key {index} sorts before the key preceding it")]
    OrderViolation { index: usize },

    /// Same key repeated with a different value
    #[error("key {index} repeats the preceding key with a different value")]
    DuplicateKey { index: usize },

    /// Values must be non-negative
    #[error("value {value} of key {index} is negative")]
    NegativeValue { index: usize, value: i32 },

    /// Value slice does not line up with the key slice
    #[error("number of keys and values mismatch: got {keys} keys and {values} values")]
    LengthMismatch { keys: usize, values: usize },

    /// Node index no longer fits the 31-bit offset space
    #[error("double array capacity exceeded")]
    CapacityExceeded,
}

//! Error types for brokerwire
//!
//! Provides a unified error type for decoding, framing and transport.
//! An unsupported api key or version is not an error here: the dispatcher
//! answers it with a regular error response.

use thiserror::Error;

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for brokerwire operations
#[derive(Debug, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    #[error("Truncated header: {field} needs {needed} bytes, {available} available")]
    TruncatedHeader {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Invalid frame size: {size} bytes (max {max})")]
    InvalidFrameSize { size: u32, max: u32 },

    #[error("Incomplete write: sent {written} of {expected} bytes")]
    TransportWriteIncomplete { expected: usize, written: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WireError {
    /// Whether this error means the request itself could not be decoded
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            WireError::TruncatedHeader { .. } | WireError::MalformedHeader(_)
        )
    }
}

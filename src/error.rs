//! Error types for the gutter core
//!
//! Construction errors are fatal and surfaced to the caller. Offset errors
//! are raised by host queries and recovered per row during a paint pass.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GutterError {
    /// A required argument was missing or unusable (e.g. no host editor)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The host editor could no longer resolve an offset or line index,
    /// typically because the document changed underneath a paint pass.
    #[error("stale offset {offset} (document length {len})")]
    StaleOffset { offset: usize, len: usize },

    /// Font bytes could not be read or parsed
    #[error("failed to load font '{family}': {reason}")]
    FontLoad { family: String, reason: String },
}

impl GutterError {
    /// Whether a paint pass may skip the offending row and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GutterError::StaleOffset { .. })
    }
}

pub type Result<T> = std::result::Result<T, GutterError>;

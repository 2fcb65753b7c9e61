//! Error types for grid construction and configuration.

use thiserror::Error;

/// Errors that can occur while building or configuring a grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A shape invariant does not hold (zero extent, zero block size,
    /// wrong number of blocks). Indicates a programming error in the caller.
    #[error("grid invariant violated: {0}")]
    Invariant(String),

    /// A configuration value is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GridError {
    /// Create an Invariant error.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

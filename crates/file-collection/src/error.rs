//! Error types for readers and collections.

use thiserror::Error;

/// Failures reported by a file reader backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReaderError {
    /// The file could not be opened.
    #[error("failed to open {0}")]
    Open(String),

    /// A hyperslab read failed.
    #[error("read failed: {0}")]
    Read(String),

    /// Releasing a variable or file failed.
    #[error("close failed: {0}")]
    Close(String),

    /// The reader handle is not open.
    #[error("invalid reader handle {0}")]
    InvalidHandle(usize),

    /// The variable does not exist in the file.
    #[error("no variable named {0}")]
    MissingVariable(String),

    /// Start/count do not fit the variable or the destination buffer.
    #[error("shape mismatch: {0}")]
    Shape(String),
}

impl ReaderError {
    /// Create an Open error.
    pub fn open(msg: impl Into<String>) -> Self {
        Self::Open(msg.into())
    }

    /// Create a Read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    /// Create a Shape error.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }
}

/// Errors raised by [`crate::Collection`] and its parts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    /// The collection inputs are inconsistent, e.g. coordinate variables
    /// without matching time dimensions.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unknown variable, timestep, time or handle.
    #[error("not found: {0}")]
    NotFound(String),

    /// A variable is defined differently in two files.
    #[error("conflicting definition: {0}")]
    Conflict(String),

    /// The underlying reader failed.
    #[error("I/O error: {0}")]
    Io(#[from] ReaderError),

    /// Internal bookkeeping is inconsistent or a call violates its contract.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl CollectionError {
    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a NotFound error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a Conflict error.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an Invariant error.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// True for [`CollectionError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;

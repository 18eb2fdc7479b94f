//! Error types for godw.

use thiserror::Error;

/// Common error type for godw.
#[derive(Error, Debug)]
pub enum GodwError {
    /// The client supplied an unusable file name.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Upload exceeds the configured maximum size.
    #[error("upload too large: [{name}] {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Requested file name.
        name: String,
        /// Declared or observed size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Every collision suffix for the requested name is taken.
    #[error("no free name left for {0}")]
    ExhaustedNamespace(String),

    /// The resolved name was claimed before the file could be created.
    #[error("{0} already exists")]
    Exists(String),

    /// Admin capability required.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for godw operations.
pub type Result<T> = std::result::Result<T, GodwError>;

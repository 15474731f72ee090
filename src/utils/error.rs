//! Error types for reelswap
//!
//! This module defines the error type used throughout the library.
//! We use thiserror for the library error and anyhow only at the
//! binary edge.

use thiserror::Error;

/// Main error type for reelswap
#[derive(Error, Debug)]
pub enum ReelError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Playlist index outside the current sequence
    #[error("Index {index} out of range for playlist of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A host component was not supplied to the builder
    #[error("Missing component: {0}")]
    MissingComponent(&'static str),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),
}

/// Convenience type alias for Results in reelswap
pub type Result<T> = std::result::Result<T, ReelError>;

/// Extension trait for converting other errors to ReelError
pub trait IntoReelError<T> {
    /// Convert this error into a ReelError with the given context
    fn config_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoReelError<T> for std::result::Result<T, E> {
    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| ReelError::Config(format!("{}: {}", context, e)))
    }
}

//! Error types for scopegen
//!
//! Generation has no recoverable runtime errors under a valid configuration.
//! The variants here cover broken internal contracts, bad configuration, and
//! the I/O around loading config files.

use thiserror::Error;

/// Result type alias for scopegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running the generator
#[derive(Error, Debug)]
pub enum Error {
    /// Attempted to pop the root scope
    #[error("scope underflow: the root scope cannot be popped")]
    ScopeUnderflow,

    /// Scope stack did not return to the program scope after a run
    #[error("unbalanced scope stack: depth {depth} after generation")]
    UnbalancedScopes {
        /// Depth observed when the run finished
        depth: usize,
    },

    /// No unused identifier was found within the retry cap
    #[error("identifier space exhausted after {attempts} attempts")]
    IdentifierExhausted {
        /// Number of candidate identifiers tried
        attempts: usize,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

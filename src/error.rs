//! Error types for the esquery library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is the [`EsQueryError`] enum. Construction of most clauses cannot fail;
//! errors are limited to malformed shorthand input, conflicting builder
//! configuration and JSON encoding.
//!
//! # Examples
//!
//! ```
//! use esquery::error::{EsQueryError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(EsQueryError::validation("dangling range operator"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for esquery operations.
#[derive(Error, Debug)]
pub enum EsQueryError {
    /// Malformed input to a clause constructor (e.g. a range shorthand
    /// operator with no value after it).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflicting or ambiguous builder configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with EsQueryError.
pub type Result<T> = std::result::Result<T, EsQueryError>;

impl EsQueryError {
    /// Create a new validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        EsQueryError::Validation(msg.into())
    }

    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        EsQueryError::Configuration(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than by
    /// encoding.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EsQueryError::Validation(_) | EsQueryError::Configuration(_)
        )
    }
}

//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    /// Query was empty after trimming
    #[error("Query must not be empty")]
    EmptyQuery,

    /// Threshold outside `0.0..=1.0`
    #[error("Invalid match threshold {0}: expected a value within 0.0..=1.0")]
    InvalidThreshold(f64),

    /// Other inconsistent matcher options
    #[error("Invalid match options: {0}")]
    InvalidOptions(String),
}

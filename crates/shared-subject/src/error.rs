//! Error types for the observer registry.
//!
//! Registration, removal and notification never fail; the only reported
//! errors come from constructing a subject with an invalid configuration.

use thiserror::Error;

/// Errors from subject construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubjectError {
    /// The configuration failed validation.
    #[error("Invalid subject configuration: {0}")]
    InvalidConfig(String),
}

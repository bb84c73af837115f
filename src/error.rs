//! Error taxonomy for the verification core.
//!
//! Configuration and domain problems are raised eagerly, before any external
//! solve starts. Data problems found while analyzing persisted result tables
//! are usually downgraded to per-group warnings by the analyzer; they only
//! surface as [`VerificationError::Data`] when a whole table is unusable.

use thiserror::Error;

/// Errors produced by the verification core.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// Invalid or inconsistent scheme/problem configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Analytic profile evaluated outside its valid parameter domain.
    #[error("Domain error: {0}")]
    Domain(String),

    /// Malformed or incomplete persisted result data.
    #[error("Data error: {0}")]
    Data(String),

    /// Opaque failure reported by the external FE engine.
    #[error("External solver '{solver}' failed: {source}")]
    ExternalSolver {
        solver: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Problem options could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VerificationError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a domain error.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    /// Create a data error.
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    /// Wrap a failure from the external solver without altering it.
    pub fn external(
        solver: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ExternalSolver {
            solver: solver.into(),
            source: source.into(),
        }
    }

    /// Whether this error belongs to the configuration class.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether this error belongs to the domain class.
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Whether this error belongs to the data class.
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VerificationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(VerificationError::config("x").is_configuration());
        assert!(VerificationError::domain("x").is_domain());
        assert!(VerificationError::data("x").is_data());
        assert!(!VerificationError::data("x").is_configuration());
    }

    #[test]
    fn test_external_failure_keeps_message() {
        let err = VerificationError::external("mock", "newton did not converge");
        let msg = err.to_string();
        assert!(msg.contains("mock"));
        assert!(msg.contains("newton did not converge"));
    }
}

//! Error types for the generation core
//!
//! The core reports three fatal conditions. None of them is retried here; a
//! scheduler that wants retries wraps the worker and decides for itself.
//!
//! Everything else the algorithms can run into (sampler shortfall, duplicate
//! edges on block boundaries, self-loops at high degree) is an accepted
//! approximation and is never reported as an error.

use thiserror::Error;

/// Errors raised by the generation core and its staging backends.
#[derive(Debug, Error)]
pub enum GenError {
    /// Invalid partition or generator parameters.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The broadcast buffer disagrees with the local configuration.
    ///
    /// This is a deployment mismatch, not a transient failure.
    #[error("degree buffer format error: {0}")]
    Format(String),

    /// A worker started before the degree buffer was staged.
    #[error("degree buffer not available: {0}")]
    BroadcastMissing(String),

    /// IO failure in a file-backed collaborator.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for the generation core.
pub type GenResult<T> = std::result::Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GenError::Format("expected 10 nodes, buffer declares 12".to_string());
        assert_eq!(
            err.to_string(),
            "degree buffer format error: expected 10 nodes, buffer declares 12"
        );

        let err = GenError::Config("worker count must be at least 1".to_string());
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}

//! Error types for pool and runner operations.

use thiserror::Error;

/// Errors produced by a [`crate::core::WorkerPool`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The pool has been shut down and accepts no further work.
    #[error("pool closed")]
    Closed,
    /// Pool configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors produced by a [`crate::core::Runner`].
///
/// Task-body failures are opaque to the runner: it neither retries nor
/// classifies them, so these two values are the complete taxonomy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    /// The deadline elapsed before the task list completed.
    #[error("received timeout")]
    Timeout,
    /// An operator interrupt ended the run early, either by draining the
    /// current task or by forced abort.
    #[error("received interrupt")]
    Interrupt,
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_error_display() {
        assert_eq!(format!("{}", PoolError::Closed), "pool closed");
        assert_eq!(
            format!(
                "{}",
                PoolError::InvalidConfig("capacity must be greater than 0".into())
            ),
            "invalid configuration: capacity must be greater than 0"
        );
    }

    #[test]
    fn test_runner_error_display() {
        assert_eq!(format!("{}", RunnerError::Timeout), "received timeout");
        assert_eq!(format!("{}", RunnerError::Interrupt), "received interrupt");
    }
}

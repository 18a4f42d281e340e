//! Error types for the executor.
//!
//! Errors only arise while an executor is being constructed. Once the workers are
//! running, misuse is ruled out by ownership (`shutdown` consumes the executor) and
//! task failures are the task's own concern.

use thiserror::Error;

/// Represents errors that can occur while building an executor.
#[derive(Error, Debug)]
pub enum PoolError {
    /// The executor was asked to run with no worker threads.
    #[error("executor capacity must be at least one worker, got {0}")]
    InvalidCapacity(usize),

    /// A per-pass budget was zero, so no work would ever leave the global queue.
    #[error("`{name}` must be at least 1")]
    InvalidThreshold {
        /// Name of the offending parameter.
        name: &'static str,
    },

    /// The operating system refused to start a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Convenient result type alias.
pub type Result<T> = std::result::Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_parameter() {
        let err = PoolError::InvalidThreshold { name: "threshold" };
        assert_eq!(err.to_string(), "`threshold` must be at least 1");

        let err = PoolError::InvalidCapacity(0);
        assert!(err.to_string().contains("got 0"));
    }
}

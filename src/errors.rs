//! Recognition Dispatcher Error Hierarchy
//!
//! Two families of failures exist:
//! - [`Error`]: returned to the caller of the dispatcher API (configuration
//!   loading/validation, notification handoff).
//! - [`ProcessError`]: produced by a [`crate::RecognitionAlgorithm`] and
//!   delivered to listeners as the failed side of a [`crate::Recognition`].
//!   It is never returned from `process` and never cached.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Dispatcher configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failures handing notification work to an execution context
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The target context no longer accepts jobs (worker stopped)
    #[error("Execution context {context} is closed")]
    ContextClosed { context: String },

    /// The job was dropped before signalling completion, usually because it panicked
    #[error("Job on execution context {context} was abandoned before completion")]
    JobAbandoned { context: String },

    /// The worker thread backing a context could not be started
    #[error("Failed to start execution context {context}")]
    SpawnFailed {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by the recognition algorithm for one input.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The algorithm cannot handle this input (e.g. empty frame)
    #[error("Input rejected by recognition algorithm: {0}")]
    InvalidInput(String),

    /// The algorithm accepted the input but recognition did not complete
    #[error("Recognition failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

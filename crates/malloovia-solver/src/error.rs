//! Error types for LP construction and the CBC adapter.

use thiserror::Error;

/// Errors that can occur while building or solving an LP model.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The CBC binary could not be located.
    #[error("CBC solver binary not found. Set MALLOOVIA_CBC_PATH or install `cbc` on PATH")]
    NotInstalled,

    /// Failed to spawn the solver subprocess.
    #[error("failed to start CBC process: {0}")]
    ProcessStart(#[source] std::io::Error),

    /// The solver process exited with a non-zero status.
    #[error("CBC process failed with exit code {exit_code:?}: {message}")]
    ProcessFailed {
        exit_code: Option<i32>,
        message: String,
    },

    /// The solver did not finish within `seconds`.
    #[error("CBC timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The `.sol` file CBC was asked to write is missing or malformed.
    #[error("could not read solution file: {0}")]
    SolutionFile(String),

    /// Generic IO error (writing the `.lp` file, creating temp files, ...).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

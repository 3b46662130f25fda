//! Unified error type for the malloovia core.
//!
//! This module provides [`MallooviaError`], the error representation shared
//! by the domain model, the LP builders and the phase controllers.

use thiserror::Error;

/// Unified error type for all malloovia operations.
#[derive(Error, Debug)]
pub enum MallooviaError {
    /// Workload-length mismatch or a missing `(instance_class, app)` performance
    /// entry. Raised before any LP is built.
    #[error("invalid problem: {0}")]
    InvalidProblem(String),

    /// Workloads in the same call disagree on their length.
    #[error("inconsistent workload lengths: {0}")]
    InconsistentWorkloadLengths(String),

    /// Unknown time-unit code.
    #[error("invalid time unit: {0}")]
    InvalidTimeUnit(String),

    /// Attempt to read cost/allocation from a non-optimal LP.
    #[error("cannot extract a result from a solve with status {0:?}")]
    NotOptimal(crate::Status),

    /// Reserved counts differ across histogram keys; should never happen for
    /// a well-formed LP.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolated(String),

    /// External solver process failure.
    #[error("solver error: {0}")]
    SolverError(String),

    /// A documented but unimplemented code path (e.g. `reuse_rsv=false`).
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// I/O errors reading a problem/solution document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Convenience type alias for Results using [`MallooviaError`].
pub type MallooviaResult<T> = Result<T, MallooviaError>;

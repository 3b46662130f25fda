//! Solve-status taxonomy shared by the LP builders and the phase controllers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single LP solve, or of an aggregated Phase II run.
///
/// Transitions are one-shot per LP instance: an LP starts `Unsolved` and
/// ends in exactly one of the base statuses. `Overfull` and `Trivial` are
/// never produced directly by a solver call; `Overfull` is derived by a
/// phase controller when the cost-minimizing LP is infeasible but the
/// dual (maximize-fulfillment) LP is optimal, and `Trivial` is accepted as
/// an input/output value for degenerate cases but never produced by this
/// core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Unsolved,
    Optimal,
    Infeasible,
    IntegerInfeasible,
    Aborted,
    SolverError,
    Unknown,
    Overfull,
    Trivial,
}

impl Status {
    /// Whether a result can be safely extracted (cost, allocation) from an
    /// LP carrying this status.
    pub fn is_optimal(self) -> bool {
        matches!(self, Status::Optimal | Status::Overfull)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

//! # malloovia-solver: LP construction and the CBC adapter
//!
//! Builds the cost-minimizing and fulfillment-maximizing LP models used by
//! the Phase I/II controllers in `malloovia-phases`, and solves them by
//! driving the external `cbc` binary as a subprocess (never linked
//! in-process — see `cbc::render_lp` and `DESIGN.md`).

pub mod builder;
pub mod cbc;
pub mod error;
pub mod lp;
pub mod testutil;

pub use builder::LpBuilder;
pub use cbc::{find_cbc_binary, is_cbc_installed, SolveOptions, SolveResult};
pub use error::{SolverError, SolverResult};
pub use lp::{Constraint, LpModel, Relation, Sense, VarKind, Variable};

// Re-exported so callers don't need a direct `malloovia-core` dependency
// just to name a solve outcome's status.
pub use malloovia_core::Status;

/// A backend capable of solving an [`LpModel`]. Implemented by [`CbcSolver`]
/// (the production path) and by [`testutil::solve`] wrapped in
/// [`testutil::BruteForceSolver`] (tests only), so the Phase I/II
/// controllers in `malloovia-phases` can be generic over either.
pub trait Solver {
    fn solve(&self, model: &LpModel, options: &SolveOptions) -> SolverResult<SolveResult>;
}

/// Drives the external `cbc` binary. See [`cbc::solve`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CbcSolver;

impl Solver for CbcSolver {
    fn solve(&self, model: &LpModel, options: &SolveOptions) -> SolverResult<SolveResult> {
        cbc::solve(model, options)
    }
}

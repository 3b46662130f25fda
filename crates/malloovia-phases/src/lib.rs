//! # malloovia-phases: Phase I / Phase II controllers
//!
//! Builds on `malloovia-core`'s domain model and `malloovia-solver`'s LP
//! builders to implement the two-phase allocation procedure (§4.6/§4.7):
//! Phase I picks a reserved-instance pool for the whole period from the
//! compressed workload histogram; Phase II re-solves per timeslot with
//! that pool pinned, falling back to the fulfillment-maximizing dual LP
//! when a timeslot's demand can't be met.

pub mod phase1;
pub mod phase2;
pub mod predictor;
pub mod solution;

#[cfg(test)]
mod test_support;

pub use phase1::PhaseI;
pub use phase2::PhaseII;
pub use predictor::{OmniscientStwPredictor, StwPredictor};
pub use solution::{GlobalSolvingStats, MallooviaStats, SolutionI, SolutionII, SolvingStats};

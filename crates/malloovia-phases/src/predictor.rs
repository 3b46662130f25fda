//! Short-term-workload predictor interface (§4.9).
//!
//! The source's predictor carries a `timeslots` attribute controllers never
//! consult; kept here as optional informational metadata (see the open
//! question in DESIGN.md), never read by [`crate::phase2::PhaseII`].

use malloovia_core::{App, MallooviaError, Problem};

/// A restartable, ordered, finite sequence of per-app workload tuples, one
/// tuple per timeslot, in `apps` order.
pub trait StwPredictor {
    /// Informational only — never consulted by the Phase II controller.
    fn timeslots(&self) -> Option<usize> {
        None
    }

    /// The full sequence of per-timeslot tuples, one entry per app in
    /// `apps` order.
    fn predict(&self, apps: &[App]) -> Result<Vec<Vec<f64>>, MallooviaError>;
}

/// The default predictor: streams a [`Problem`]'s own workloads back
/// unchanged, so Phase II's short-term prediction equals Phase I's
/// long-term one (§8 property 7 / scenario E).
pub struct OmniscientStwPredictor<'p> {
    problem: &'p Problem,
}

impl<'p> OmniscientStwPredictor<'p> {
    pub fn new(problem: &'p Problem) -> Self {
        Self { problem }
    }
}

impl StwPredictor for OmniscientStwPredictor<'_> {
    fn timeslots(&self) -> Option<usize> {
        Some(self.problem.timeslots())
    }

    fn predict(&self, apps: &[App]) -> Result<Vec<Vec<f64>>, MallooviaError> {
        workload_tuples(&self.problem.workloads, apps)
    }
}

/// Reorders a set of per-app [`Workload`](malloovia_core::Workload)s into
/// one tuple per timeslot, in `apps` order — the same reordering
/// `Histogram::build` does internally, but kept per-timeslot instead of
/// compressed, since Phase II walks timeslots one at a time.
pub fn workload_tuples(
    workloads: &[malloovia_core::Workload],
    apps: &[App],
) -> Result<Vec<Vec<f64>>, MallooviaError> {
    use std::collections::HashMap;

    let mut lengths = workloads.iter().map(|w| w.values.len());
    let t = lengths.next().unwrap_or(0);
    if let Some(mismatch) = lengths.find(|len| *len != t) {
        return Err(MallooviaError::InconsistentWorkloadLengths(format!(
            "expected length {t}, found {mismatch}"
        )));
    }

    let by_app: HashMap<_, _> = workloads.iter().map(|w| (&w.app, w)).collect();
    Ok((0..t)
        .map(|timeslot| {
            apps.iter()
                .map(|app| {
                    by_app
                        .get(&app.id)
                        .map(|w| w.values[timeslot])
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect())
}

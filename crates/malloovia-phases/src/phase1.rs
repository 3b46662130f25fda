//! Phase I: the long-term problem over the full reservation period,
//! compressed through the workload histogram (§4.6).

use std::time::Instant;

use malloovia_core::{Histogram, MallooviaError, Problem, ReservedAllocation, Status, System};
use malloovia_solver::{LpBuilder, SolveOptions, Solver};
use tracing::{debug, info};

use crate::solution::{MallooviaStats, SolutionI, SolvingStats};

/// Solves the cost-minimizing LP over a [`Problem`]'s full workload
/// history. Generic over the solver backend so tests can run against
/// `malloovia_solver::testutil::BruteForceSolver` instead of shelling out
/// to `cbc`.
pub struct PhaseI<S> {
    solver: S,
    relaxed: bool,
}

impl<S: Solver> PhaseI<S> {
    pub fn new(solver: S, relaxed: bool) -> Self {
        Self { solver, relaxed }
    }

    /// Runs the six-step Phase I procedure: validate, derive the
    /// workload-independent `System`, compress the histogram, build the
    /// cost-minimizing LP (`preallocation`, when given, pins reserved
    /// counts rather than letting Phase I choose them), solve, decode.
    ///
    /// A non-optimal solve does not error: the returned [`SolutionI`]
    /// carries the status and leaves `allocation`/`cost` unset (§7 — Phase
    /// I does not recover from a non-optimal result, callers must check
    /// `stats.status`).
    pub fn solve(
        &self,
        problem: &Problem,
        options: &SolveOptions,
        preallocation: Option<&ReservedAllocation>,
    ) -> Result<SolutionI, MallooviaError> {
        problem.check_valid()?;

        let create_start = Instant::now();
        let system = System::from_problem(problem);
        let histogram = Histogram::build(&problem.workloads, &system.apps)?;
        let timeslot_unit = problem
            .workloads
            .first()
            .map(|w| w.time_unit)
            .unwrap_or(malloovia_core::TimeUnit::Hour);
        let builder = LpBuilder::new(&system, &histogram, timeslot_unit, self.relaxed);
        let model = builder.build_minimize_cost(preallocation, None)?;
        let creation_time = create_start.elapsed();
        debug!(keys = histogram.len(), ?creation_time, "Phase I LP built");

        let solve_start = Instant::now();
        let result = self
            .solver
            .solve(&model, options)
            .map_err(|e| MallooviaError::SolverError(e.to_string()))?;
        let solving_time = solve_start.elapsed();
        info!(status = ?result.status, ?solving_time, "Phase I solved");

        let stats = MallooviaStats {
            solving_stats: SolvingStats {
                creation_time,
                solving_time,
            },
            status: result.status,
            gcd: false,
            gcd_multiplier: 1.0,
        };

        if result.status != Status::Optimal {
            return Ok(SolutionI {
                stats,
                reserved_allocation: None,
                allocation: None,
                cost: None,
            });
        }

        let reserved_allocation = builder.reserved_allocation(&result.variable_values)?;
        let allocation = builder.allocation(&result.variable_values)?;
        let cost = builder.cost(&result.variable_values)?;

        Ok(SolutionI {
            stats,
            reserved_allocation: Some(reserved_allocation),
            allocation: Some(allocation),
            cost: Some(cost),
        })
    }
}

//! Phase II: the short-term problem, iterated timeslot by timeslot with
//! Phase I's reserved pool pinned, falling back to the fulfillment-
//! maximizing dual LP when a timeslot can't be met in full (§4.7).

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Instant;

use malloovia_core::{
    AllocationInfo, AllocationUnits, Histogram, MallooviaError, OrderedF64, ReservedAllocation,
    Status, System, TimeUnit, Workload,
};
use malloovia_solver::{LpBuilder, SolveOptions, Solver};
use tracing::{debug, warn};

use crate::predictor::StwPredictor;
use crate::solution::{GlobalSolvingStats, SolutionII, SolvingStats};

/// Solves Phase II over a whole reservation period, caching identical
/// timeslots (§5 — owned exclusively by this controller instance; not
/// shared across runs).
pub struct PhaseII<S> {
    solver: S,
    relaxed: bool,
    timeslot_unit: TimeUnit,
    options: SolveOptions,
    reuse_rsv: bool,
    cache: RefCell<HashMap<CacheKey, TimeslotOutcome>>,
}

impl<S: Solver> PhaseII<S> {
    /// `reuse_rsv` selects how `reserved` is treated: `true` is the only
    /// implemented mode (the reserved pool bought by Phase I is shared
    /// across apps and pinned as-is, §4.7). `false` would mean per-app
    /// pinned reservations (each app may only use the reserved instances
    /// it bought); that mode is a documented but unimplemented surface
    /// (§7) and `solve_period` rejects it with `NotImplemented`.
    pub fn new(
        solver: S,
        relaxed: bool,
        timeslot_unit: TimeUnit,
        options: SolveOptions,
        reuse_rsv: bool,
    ) -> Self {
        Self {
            solver,
            relaxed,
            timeslot_unit,
            options,
            reuse_rsv,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Solves every timeslot `predictor` produces, with `reserved` pinned
    /// throughout. `on_demand_floor`, when given, is the Guided-mode
    /// on-demand lower bound, merged into every timeslot's LP and into the
    /// cache key.
    pub fn solve_period(
        &self,
        system: &System,
        reserved: &ReservedAllocation,
        predictor: &dyn StwPredictor,
        on_demand_floor: Option<&ReservedAllocation>,
    ) -> Result<SolutionII, MallooviaError> {
        if !self.reuse_rsv {
            return Err(MallooviaError::NotImplemented(
                "reuse_rsv=false (per-app-pinned reservations) is not implemented".into(),
            ));
        }

        let tuples = predictor.predict(&system.apps)?;

        let mut global_stats = GlobalSolvingStats::default();
        let mut per_timeslot_status = Vec::with_capacity(tuples.len());
        let mut per_timeslot_cost = Vec::with_capacity(tuples.len());
        let mut values = Vec::with_capacity(tuples.len());
        let mut total_cost = 0.0;
        let mut any_cost = false;

        for tuple in &tuples {
            let outcome = self.solve_timeslot(system, reserved, on_demand_floor, tuple)?;
            global_stats.add(&outcome.stats);
            per_timeslot_status.push(outcome.status);
            per_timeslot_cost.push(outcome.cost);
            match &outcome.allocation {
                Some(alloc) => values.push(alloc.values[0].clone()),
                None => values.push(vec![
                    vec![0.0; system.instance_classes.len()];
                    system.apps.len()
                ]),
            }
            if let Some(cost) = outcome.cost {
                total_cost += cost;
                any_cost = true;
            }
        }

        let status = aggregate_status(&per_timeslot_status);
        let allocation = AllocationInfo {
            apps: system.apps.iter().map(|a| a.id.clone()).collect(),
            instance_classes: system
                .instance_classes
                .iter()
                .map(|ic| ic.id.clone())
                .collect(),
            units: AllocationUnits::Vms,
            repeats: vec![1; tuples.len()],
            values,
        };

        Ok(SolutionII {
            stats: global_stats,
            status,
            allocation: Some(allocation),
            cost: any_cost.then_some(total_cost),
            per_timeslot_status,
            per_timeslot_cost,
        })
    }

    fn solve_timeslot(
        &self,
        system: &System,
        reserved: &ReservedAllocation,
        on_demand_floor: Option<&ReservedAllocation>,
        tuple: &[f64],
    ) -> Result<TimeslotOutcome, MallooviaError> {
        let key = CacheKey::new(reserved, on_demand_floor, tuple);
        if let Some(cached) = self.cache.borrow().get(&key) {
            debug!("Phase II cache hit");
            return Ok(cached.clone());
        }

        let workloads: Vec<Workload> = system
            .apps
            .iter()
            .zip(tuple.iter())
            .map(|(app, &value)| Workload {
                app: app.id.clone(),
                values: vec![value],
                time_unit: self.timeslot_unit,
            })
            .collect();
        let histogram = Histogram::build(&workloads, &system.apps)?;
        let builder = LpBuilder::new(system, &histogram, self.timeslot_unit, self.relaxed);

        let create_start = Instant::now();
        let model = builder.build_minimize_cost(Some(reserved), on_demand_floor)?;
        let mut creation_time = create_start.elapsed();

        let solve_start = Instant::now();
        let result = self
            .solver
            .solve(&model, &self.options)
            .map_err(|e| MallooviaError::SolverError(e.to_string()))?;
        let mut solving_time = solve_start.elapsed();

        let outcome = if result.status == Status::Optimal {
            TimeslotOutcome {
                status: Status::Optimal,
                allocation: Some(builder.allocation(&result.variable_values)?),
                cost: Some(builder.cost(&result.variable_values)?),
                stats: SolvingStats {
                    creation_time,
                    solving_time,
                },
            }
        } else {
            warn!(status = ?result.status, "Phase II timeslot infeasible, falling back to dual LP");
            let dual_create_start = Instant::now();
            let dual_model = builder.build_maximize_fulfillment(reserved, on_demand_floor)?;
            creation_time += dual_create_start.elapsed();

            let dual_solve_start = Instant::now();
            let dual_result = self
                .solver
                .solve(&dual_model, &self.options)
                .map_err(|e| MallooviaError::SolverError(e.to_string()))?;
            solving_time += dual_solve_start.elapsed();

            if dual_result.status == Status::Optimal {
                TimeslotOutcome {
                    status: Status::Overfull,
                    allocation: Some(builder.allocation(&dual_result.variable_values)?),
                    cost: Some(builder.cost(&dual_result.variable_values)?),
                    stats: SolvingStats {
                        creation_time,
                        solving_time,
                    },
                }
            } else {
                TimeslotOutcome {
                    status: dual_result.status,
                    allocation: None,
                    cost: None,
                    stats: SolvingStats {
                        creation_time,
                        solving_time,
                    },
                }
            }
        };

        self.cache.borrow_mut().insert(key, outcome.clone());
        Ok(outcome)
    }
}

/// §4.7's aggregation rule: all optimal wins outright; any infeasibility
/// anywhere dominates (the period can't be honestly called anything but
/// infeasible); otherwise any overfull timeslot makes the period overfull;
/// anything else is unknown.
fn aggregate_status(statuses: &[Status]) -> Status {
    if statuses.is_empty() {
        return Status::Unsolved;
    }
    if statuses.iter().all(|s| *s == Status::Optimal) {
        return Status::Optimal;
    }
    if statuses
        .iter()
        .any(|s| matches!(s, Status::Infeasible | Status::IntegerInfeasible))
    {
        return Status::Infeasible;
    }
    if statuses.contains(&Status::Overfull) {
        return Status::Overfull;
    }
    Status::Unknown
}

#[derive(Debug, Clone)]
struct TimeslotOutcome {
    status: Status,
    allocation: Option<AllocationInfo>,
    cost: Option<f64>,
    stats: SolvingStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    reserved: Vec<(String, OrderedF64)>,
    on_demand_floor: Vec<(String, OrderedF64)>,
    workload: Vec<OrderedF64>,
}

impl CacheKey {
    fn new(
        reserved: &ReservedAllocation,
        on_demand_floor: Option<&ReservedAllocation>,
        workload: &[f64],
    ) -> Self {
        let flatten = |alloc: &ReservedAllocation| {
            alloc
                .instance_classes
                .iter()
                .zip(alloc.vms_number.iter())
                .map(|(id, &v)| (id.0.clone(), OrderedF64(v)))
                .collect::<Vec<_>>()
        };
        Self {
            reserved: flatten(reserved),
            on_demand_floor: on_demand_floor.map(flatten).unwrap_or_default(),
            workload: workload.iter().copied().map(OrderedF64).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase1::PhaseI;
    use crate::predictor::OmniscientStwPredictor;
    use malloovia_solver::testutil::BruteForceSolver;

    fn solved_scenario_b() -> (System, ReservedAllocation, malloovia_core::Problem) {
        let problem = crate::test_support::scenario_b_problem();
        let system = System::from_problem(&problem);
        let phase1 = PhaseI::new(BruteForceSolver, false);
        let solution_i = phase1
            .solve(&problem, &SolveOptions::default(), None)
            .unwrap();
        (system, solution_i.reserved_allocation.unwrap(), problem)
    }

    /// Scenario E (§8): STW == LTW, so Phase II's per-timeslot costs sum
    /// back to Phase I's cost and the aggregate status is optimal.
    #[test]
    fn scenario_e_matches_phase_i_cost_when_stw_equals_ltw() {
        let (system, reserved, problem) = solved_scenario_b();
        let predictor = OmniscientStwPredictor::new(&problem);
        let phase2 = PhaseII::new(
            BruteForceSolver,
            false,
            TimeUnit::Hour,
            SolveOptions::default(),
            true,
        );
        let solution = phase2
            .solve_period(&system, &reserved, &predictor, None)
            .unwrap();

        assert_eq!(solution.status, Status::Optimal);
        assert!(solution
            .per_timeslot_status
            .iter()
            .all(|s| *s == Status::Optimal));
        assert_eq!(solution.cost, Some(178.0));
    }

    /// Scenario F (§8): timeslot 1's app0 load spikes to 270, exceeding
    /// what the fixed reserved pool plus the on-demand cap can deliver.
    #[test]
    fn scenario_f_reports_overfull_timeslot_with_dual_allocation() {
        let (system, reserved, _problem) = solved_scenario_b();
        let f_problem = crate::test_support::scenario_f_problem();
        let predictor = OmniscientStwPredictor::new(&f_problem);
        let phase2 = PhaseII::new(
            BruteForceSolver,
            false,
            TimeUnit::Hour,
            SolveOptions::default(),
            true,
        );
        let solution = phase2
            .solve_period(&system, &reserved, &predictor, None)
            .unwrap();

        assert_eq!(solution.status, Status::Overfull);
        assert_eq!(solution.per_timeslot_status[1], Status::Overfull);
        // The dual LP has alternate optima here (app0/app1 can trade
        // reserved for on-demand within the shared pools at equal total
        // cost), so only the timeslot's aggregate numbers are pinned down,
        // not the exact per-app split.
        assert_eq!(solution.per_timeslot_cost[1], Some(242.0));

        let allocation = solution.allocation.unwrap();
        let reserved_idx = allocation
            .instance_classes
            .iter()
            .position(|ic| ic == &malloovia_core::InstanceClassId("m1.reserved".into()))
            .unwrap();
        let demand_idx = allocation
            .instance_classes
            .iter()
            .position(|ic| ic == &malloovia_core::InstanceClassId("m1.demand".into()))
            .unwrap();
        let overfull_timeslot = &allocation.values[1];
        let total_reserved: f64 = overfull_timeslot.iter().map(|app| app[reserved_idx]).sum();
        let total_demand: f64 = overfull_timeslot.iter().map(|app| app[demand_idx]).sum();
        assert_eq!(total_reserved, 6.0);
        assert_eq!(total_demand, 20.0);
    }

    /// §7: `reuse_rsv=false` (per-app-pinned reservations) is a documented
    /// but unimplemented surface.
    #[test]
    fn reuse_rsv_false_is_rejected_as_not_implemented() {
        let (system, reserved, problem) = solved_scenario_b();
        let predictor = OmniscientStwPredictor::new(&problem);
        let phase2 = PhaseII::new(
            BruteForceSolver,
            false,
            TimeUnit::Hour,
            SolveOptions::default(),
            false,
        );
        let err = phase2
            .solve_period(&system, &reserved, &predictor, None)
            .unwrap_err();
        assert!(matches!(err, MallooviaError::NotImplemented(_)));
    }
}

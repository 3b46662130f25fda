//! Immutable domain model.
//!
//! All value types here are constructed once at problem-load time and never
//! mutated; LP objects built from them are solved, decoded and discarded per
//! phase or per timeslot (see the phase controllers in `malloovia-phases`).

use crate::error::MallooviaError;
use crate::units::TimeUnit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of an [`App`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppId(pub String);

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a [`LimitingSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LimitingSetId(pub String);

impl fmt::Display for LimitingSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an [`InstanceClass`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceClassId(pub String);

impl fmt::Display for InstanceClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A workload-producing application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: AppId,
    pub name: String,
}

/// A region/zone bounding the total VM and/or core count across the
/// instance classes that belong to it. `max_vms`/`max_cores` of `0` mean
/// unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitingSet {
    pub id: LimitingSetId,
    pub name: String,
    pub max_vms: u32,
    pub max_cores: u32,
}

impl LimitingSet {
    pub fn has_vm_cap(&self) -> bool {
        self.max_vms > 0
    }

    pub fn has_core_cap(&self) -> bool {
        self.max_cores > 0
    }
}

/// A purchasable VM type.
///
/// `price` is given per `price_time_unit` and is scaled to the problem's
/// timeslot unit at LP-build time (see [`TimeUnit::scale_price`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceClass {
    pub id: InstanceClassId,
    pub name: String,
    pub limiting_sets: Vec<LimitingSetId>,
    pub max_vms: u32,
    pub price: f64,
    pub price_time_unit: TimeUnit,
    pub cores: u32,
    pub is_reserved: bool,
    pub is_private: bool,
}

impl InstanceClass {
    pub fn has_vm_cap(&self) -> bool {
        self.max_vms > 0
    }

    /// Price scaled to `timeslot_unit`.
    pub fn scaled_price(&self, timeslot_unit: TimeUnit) -> f64 {
        TimeUnit::scale_price(self.price, self.price_time_unit, timeslot_unit)
    }
}

/// Dense mapping `(InstanceClass, App) -> rate`, with a single
/// `perf_time_unit`. Lookup by pair must be total over all `(ic, app)` pairs
/// used by the problem — enforced by [`Problem::check_valid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTable {
    pub perf_time_unit: TimeUnit,
    values: HashMap<(InstanceClassId, AppId), f64>,
}

impl PerformanceTable {
    pub fn new(perf_time_unit: TimeUnit, values: HashMap<(InstanceClassId, AppId), f64>) -> Self {
        Self {
            perf_time_unit,
            values,
        }
    }

    /// Raw (unscaled) performance of `ic` running `app`, if declared.
    pub fn get(&self, ic: &InstanceClassId, app: &AppId) -> Option<f64> {
        self.values.get(&(ic.clone(), app.clone())).copied()
    }

    /// Performance of `ic` running `app`, scaled to `timeslot_unit`.
    pub fn scaled(&self, ic: &InstanceClassId, app: &AppId, timeslot_unit: TimeUnit) -> Option<f64> {
        self.get(ic, app)
            .map(|raw| TimeUnit::scale_performance(raw, self.perf_time_unit, timeslot_unit))
    }
}

/// Per-app load prediction: a finite ordered sequence of non-negative
/// numbers of length `T`, one per timeslot, in `time_unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub app: AppId,
    pub values: Vec<f64>,
    pub time_unit: TimeUnit,
}

impl Workload {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A full problem: the workload-independent [`System`] plus the per-app
/// workload predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub name: String,
    pub workloads: Vec<Workload>,
    pub instance_classes: Vec<InstanceClass>,
    pub limiting_sets: Vec<LimitingSet>,
    pub performances: PerformanceTable,
}

impl Problem {
    /// Validates structural invariants that must hold before any LP is
    /// built: every workload shares the same length, and the performance
    /// table is total over every `(ic, app)` pair reachable from this
    /// problem.
    pub fn check_valid(&self) -> Result<(), MallooviaError> {
        let mut lengths = self.workloads.iter().map(Workload::len);
        if let Some(first) = lengths.next() {
            if let Some(mismatch) = lengths.find(|len| *len != first) {
                return Err(MallooviaError::InconsistentWorkloadLengths(format!(
                    "expected length {first}, found {mismatch}"
                )));
            }
        }

        for app in self.workloads.iter().map(|w| &w.app) {
            for ic in &self.instance_classes {
                if self.performances.get(&ic.id, app).is_none() {
                    return Err(MallooviaError::InvalidProblem(format!(
                        "missing performance entry for instance class '{}' and app '{}'",
                        ic.id, app
                    )));
                }
            }
        }

        for ic in &self.instance_classes {
            if ic.limiting_sets.is_empty() {
                return Err(MallooviaError::InvalidProblem(format!(
                    "instance class '{}' belongs to no limiting set",
                    ic.id
                )));
            }
            if ic.cores == 0 {
                return Err(MallooviaError::InvalidProblem(format!(
                    "instance class '{}' declares zero cores",
                    ic.id
                )));
            }
        }

        Ok(())
    }

    /// The common timeslot length `T`, if workloads are present and
    /// consistent.
    pub fn timeslots(&self) -> usize {
        self.workloads.first().map(Workload::len).unwrap_or(0)
    }

    /// Adds a diagnostics pass over the document-level checks (distinct
    /// from the hard errors raised by [`check_valid`](Self::check_valid)):
    /// reports dangling limiting-set references as warnings rather than
    /// aborting.
    pub fn validate_into(&self, diagnostics: &mut crate::diagnostics::Diagnostics) {
        let known_limiting_sets: std::collections::HashSet<_> =
            self.limiting_sets.iter().map(|ls| &ls.id).collect();
        for ic in &self.instance_classes {
            for ls in &ic.limiting_sets {
                if !known_limiting_sets.contains(ls) {
                    diagnostics.add_error_with_entity(
                        "reference",
                        &format!("limiting set '{ls}' is not declared"),
                        &ic.id.0,
                    );
                }
            }
        }
        if self.workloads.is_empty() {
            diagnostics.add_warning("validation", "problem declares no workloads");
        }
    }
}

/// `Problem` minus workloads: the workload-independent portion, with the
/// set of apps reachable from the problem's workloads (in first-seen
/// order).
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub apps: Vec<App>,
    pub instance_classes: Vec<InstanceClass>,
    pub limiting_sets: Vec<LimitingSet>,
    pub performances: PerformanceTable,
}

impl System {
    /// Builds the workload-independent [`System`] from a [`Problem`],
    /// collecting the apps reachable from its workloads in the order they
    /// first appear.
    pub fn from_problem(problem: &Problem) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut apps = Vec::new();
        for workload in &problem.workloads {
            if seen.insert(workload.app.clone()) {
                apps.push(App {
                    id: workload.app.clone(),
                    name: workload.app.0.clone(),
                });
            }
        }
        System {
            apps,
            instance_classes: problem.instance_classes.clone(),
            limiting_sets: problem.limiting_sets.clone(),
            performances: problem.performances.clone(),
        }
    }

    pub fn reserved_instance_classes(&self) -> impl Iterator<Item = &InstanceClass> {
        self.instance_classes.iter().filter(|ic| ic.is_reserved)
    }

    pub fn on_demand_instance_classes(&self) -> impl Iterator<Item = &InstanceClass> {
        self.instance_classes.iter().filter(|ic| !ic.is_reserved)
    }

    pub fn limiting_set(&self, id: &LimitingSetId) -> Option<&LimitingSet> {
        self.limiting_sets.iter().find(|ls| &ls.id == id)
    }
}

/// Per-reserved-class VM counts, valid for the entire reservation period and
/// summed across apps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedAllocation {
    pub instance_classes: Vec<InstanceClassId>,
    pub vms_number: Vec<f64>,
}

impl ReservedAllocation {
    pub fn get(&self, ic: &InstanceClassId) -> Option<f64> {
        self.instance_classes
            .iter()
            .position(|id| id == ic)
            .map(|idx| self.vms_number[idx])
    }
}

/// Units an [`AllocationInfo`] array is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationUnits {
    Vms,
    Cost,
    Rph,
}

/// A three-dimensional non-negative array `values[w_index][app_index][ic_index]`
/// with side tables naming each axis.
///
/// `repeats`, when non-empty, holds the histogram count for each `w_index`
/// (used for histogram-keyed allocations produced by Phase I); it is empty
/// or all-ones for per-timeslot allocations produced by Phase II.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationInfo {
    pub apps: Vec<AppId>,
    pub instance_classes: Vec<InstanceClassId>,
    pub units: AllocationUnits,
    pub values: Vec<Vec<Vec<f64>>>,
    pub repeats: Vec<u64>,
}

impl AllocationInfo {
    pub fn num_keys(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str) -> AppId {
        AppId(id.to_string())
    }

    fn ic(id: &str) -> InstanceClassId {
        InstanceClassId(id.to_string())
    }

    fn sample_problem() -> Problem {
        let ls = LimitingSet {
            id: LimitingSetId("ls0".into()),
            name: "region".into(),
            max_vms: 0,
            max_cores: 0,
        };
        let reserved = InstanceClass {
            id: ic("m1.reserved"),
            name: "m1.reserved".into(),
            limiting_sets: vec![ls.id.clone()],
            max_vms: 0,
            price: 80.0,
            price_time_unit: TimeUnit::Hour,
            cores: 1,
            is_reserved: true,
            is_private: false,
        };
        let on_demand = InstanceClass {
            id: ic("m1.demand"),
            name: "m1.demand".into(),
            limiting_sets: vec![ls.id.clone()],
            max_vms: 0,
            price: 100.0,
            price_time_unit: TimeUnit::Hour,
            cores: 1,
            is_reserved: false,
            is_private: false,
        };
        let mut perf = HashMap::new();
        perf.insert((reserved.id.clone(), app("app0")), 1000.0);
        perf.insert((on_demand.id.clone(), app("app0")), 1000.0);
        Problem {
            id: "p0".into(),
            name: "problem".into(),
            workloads: vec![Workload {
                app: app("app0"),
                values: vec![2000.0, 2000.0],
                time_unit: TimeUnit::Hour,
            }],
            instance_classes: vec![reserved, on_demand],
            limiting_sets: vec![ls],
            performances: PerformanceTable::new(TimeUnit::Hour, perf),
        }
    }

    #[test]
    fn check_valid_accepts_well_formed_problem() {
        assert!(sample_problem().check_valid().is_ok());
    }

    #[test]
    fn check_valid_rejects_missing_performance_entry() {
        let mut problem = sample_problem();
        problem.performances = PerformanceTable::new(TimeUnit::Hour, HashMap::new());
        let err = problem.check_valid().unwrap_err();
        assert!(matches!(err, MallooviaError::InvalidProblem(_)));
    }

    #[test]
    fn check_valid_rejects_inconsistent_workload_lengths() {
        let mut problem = sample_problem();
        problem.workloads.push(Workload {
            app: app("app1"),
            values: vec![1.0],
            time_unit: TimeUnit::Hour,
        });
        let err = problem.check_valid().unwrap_err();
        assert!(matches!(err, MallooviaError::InconsistentWorkloadLengths(_)));
    }

    #[test]
    fn system_from_problem_collects_apps_in_first_seen_order() {
        let mut problem = sample_problem();
        problem.workloads.push(Workload {
            app: app("app1"),
            values: vec![1.0, 1.0],
            time_unit: TimeUnit::Hour,
        });
        let system = System::from_problem(&problem);
        assert_eq!(system.apps.len(), 2);
        assert_eq!(system.apps[0].id, app("app0"));
        assert_eq!(system.apps[1].id, app("app1"));
    }

    #[test]
    fn reserved_allocation_lookup() {
        let alloc = ReservedAllocation {
            instance_classes: vec![ic("m1.reserved")],
            vms_number: vec![2.0],
        };
        assert_eq!(alloc.get(&ic("m1.reserved")), Some(2.0));
        assert_eq!(alloc.get(&ic("missing")), None);
    }

    /// Invariant 6 (§8): serializing a Problem and parsing it back yields
    /// an equal Problem, referenced entities (ids) included.
    #[test]
    fn problem_round_trips_through_serialization() {
        let problem = sample_problem();
        let yaml = serde_yaml::to_string(&problem).unwrap();
        let restored: Problem = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(problem, restored);
    }
}

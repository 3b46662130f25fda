//! LP builders: translate a [`System`] and a [`Histogram`] into an
//! [`LpModel`], and decode a solved model back into the domain's allocation
//! types.
//!
//! Two builders are provided, grounded on `lpsolver.py`'s `MallooviaLp` and
//! `MallooviaLpMaximizeTimeslotPerformance`:
//!
//! - [`LpBuilder::build_minimize_cost`] — the cost-minimizing LP used by
//!   Phase I over the full workload histogram, and by Phase II per timeslot
//!   with the reserved counts pinned to Phase I's result.
//! - [`LpBuilder::build_maximize_fulfillment`] — the dual, fulfillment-
//!   maximizing LP used as Phase II's fallback when the cost-minimizing LP
//!   is infeasible for a timeslot (producing [`malloovia_core::Status::Overfull`]
//!   once projected back through prices). Assumes a single-key histogram: it
//!   is only ever solved per timeslot.
//!
//! Variable names are stable and independent of iteration order, derived
//! directly from app/instance-class ids and the histogram key's stable hash
//! rather than from positional indices, so two builds over equal inputs
//! produce identical models (REDESIGN FLAG #2).

use std::collections::HashMap;

use malloovia_core::{
    AllocationInfo, AllocationUnits, AppId, Histogram, InstanceClass, InstanceClassId,
    MallooviaError, ReservedAllocation, System, TimeUnit,
};

use crate::lp::{LpModel, Relation, Sense, VarKind};

/// Name of the reserved-instance variable `Y[a,r]`.
pub fn y_var(app: &AppId, ic: &InstanceClassId) -> String {
    format!("Y__{}__{}", app.0, ic.0)
}

/// Name of the on-demand variable `X[a,d,w]`.
pub fn x_var(app: &AppId, ic: &InstanceClassId, key_hash: u64) -> String {
    format!("X__{}__{}__{key_hash:x}", app.0, ic.0)
}

/// Builds LP models over a fixed `(System, Histogram)` pair.
pub struct LpBuilder<'a> {
    system: &'a System,
    histogram: &'a Histogram,
    timeslot_unit: TimeUnit,
    relaxed: bool,
}

impl<'a> LpBuilder<'a> {
    pub fn new(
        system: &'a System,
        histogram: &'a Histogram,
        timeslot_unit: TimeUnit,
        relaxed: bool,
    ) -> Self {
        Self {
            system,
            histogram,
            timeslot_unit,
            relaxed,
        }
    }

    fn var_kind(&self) -> VarKind {
        if self.relaxed {
            VarKind::Continuous
        } else {
            VarKind::Integer
        }
    }

    /// Cost-minimizing LP (§4.3). When `fixed_reserved` is given, the
    /// reserved instance counts are pinned by equality rather than left free
    /// — this is how Phase II (§4.7) reuses the same builder with Phase I's
    /// result. `on_demand_floor`, when given, adds the Guided-mode lower
    /// bound on on-demand instance counts (§4.3 item 3 / §4.7).
    pub fn build_minimize_cost(
        &self,
        fixed_reserved: Option<&ReservedAllocation>,
        on_demand_floor: Option<&ReservedAllocation>,
    ) -> Result<LpModel, MallooviaError> {
        let mut model = LpModel::new("malloovia_min_cost", Sense::Minimize);
        self.declare_variables(&mut model);
        self.add_objective_min_cost(&mut model);
        self.add_performance_restriction(&mut model, Relation::Ge);
        self.add_limit_instances_per_class(&mut model);
        if let Some(fixed) = fixed_reserved {
            self.add_set_fixed_reserved(&mut model, fixed)?;
        }
        if let Some(floor) = on_demand_floor {
            self.add_on_demand_floor(&mut model, floor);
        }
        self.add_limit_instances_per_limiting_set(&mut model);
        self.add_limit_cores_per_limiting_set(&mut model);
        Ok(model)
    }

    /// Fulfillment-maximizing dual LP (§4.4), reserved counts pinned to
    /// `fixed_reserved`. `on_demand_floor` carries the Guided-mode lower
    /// bound through to the dual fallback, same as `build_minimize_cost`.
    pub fn build_maximize_fulfillment(
        &self,
        fixed_reserved: &ReservedAllocation,
        on_demand_floor: Option<&ReservedAllocation>,
    ) -> Result<LpModel, MallooviaError> {
        let mut model = LpModel::new("malloovia_max_fulfillment", Sense::Maximize);
        self.declare_variables(&mut model);
        self.add_objective_max_fulfillment(&mut model);
        self.add_performance_restriction(&mut model, Relation::Le);
        self.add_limit_instances_per_class(&mut model);
        self.add_set_fixed_reserved(&mut model, fixed_reserved)?;
        if let Some(floor) = on_demand_floor {
            self.add_on_demand_floor(&mut model, floor);
        }
        self.add_limit_instances_per_limiting_set(&mut model);
        self.add_limit_cores_per_limiting_set(&mut model);
        Ok(model)
    }

    fn declare_variables(&self, model: &mut LpModel) {
        let kind = self.var_kind();
        for app in &self.system.apps {
            for r in self.system.reserved_instance_classes() {
                model.add_variable(y_var(&app.id, &r.id), kind);
            }
            for d in self.system.on_demand_instance_classes() {
                for key in self.histogram.keys() {
                    model.add_variable(x_var(&app.id, &d.id, key.hash), kind);
                }
            }
        }
    }

    /// A reserved VM is bought once and runs every timeslot in the period,
    /// so its objective coefficient is its per-timeslot price times the
    /// period length (`histogram.total()`), not the price alone — unlike
    /// on-demand VMs, which are bought fresh per timeslot and so are only
    /// charged for the timeslots they're needed (`count`, not `total`).
    fn add_objective_min_cost(&self, model: &mut LpModel) {
        let period = self.histogram.total() as f64;
        for app in &self.system.apps {
            for r in self.system.reserved_instance_classes() {
                model.objective.add(
                    &y_var(&app.id, &r.id),
                    r.scaled_price(self.timeslot_unit) * period,
                );
            }
            for d in self.system.on_demand_instance_classes() {
                let price = d.scaled_price(self.timeslot_unit);
                for (key, count) in self.histogram.iter() {
                    model
                        .objective
                        .add(&x_var(&app.id, &d.id, key.hash), price * count as f64);
                }
            }
        }
    }

    /// Maximizes total fulfilled workload fraction, skipping apps with zero
    /// workload in the (single) histogram key to avoid division by zero —
    /// mirrors `_cost_function` in `MallooviaLpMaximizeTimeslotPerformance`.
    fn add_objective_max_fulfillment(&self, model: &mut LpModel) {
        for (key, _count) in self.histogram.iter() {
            for (app_idx, app) in self.system.apps.iter().enumerate() {
                let workload = key.tuple[app_idx];
                if workload <= 0.0 {
                    continue;
                }
                for r in self.system.reserved_instance_classes() {
                    if let Some(perf) =
                        self.system
                            .performances
                            .scaled(&r.id, &app.id, self.timeslot_unit)
                    {
                        model
                            .objective
                            .add(&y_var(&app.id, &r.id), perf / workload);
                    }
                }
                for d in self.system.on_demand_instance_classes() {
                    if let Some(perf) =
                        self.system
                            .performances
                            .scaled(&d.id, &app.id, self.timeslot_unit)
                    {
                        model
                            .objective
                            .add(&x_var(&app.id, &d.id, key.hash), perf / workload);
                    }
                }
            }
        }
    }

    fn add_performance_restriction(&self, model: &mut LpModel, relation: Relation) {
        for (app_idx, app) in self.system.apps.iter().enumerate() {
            for key in self.histogram.keys() {
                let workload = key.tuple[app_idx];
                let mut terms = Vec::new();
                for r in self.system.reserved_instance_classes() {
                    if let Some(perf) =
                        self.system
                            .performances
                            .scaled(&r.id, &app.id, self.timeslot_unit)
                    {
                        terms.push((y_var(&app.id, &r.id), perf));
                    }
                }
                for d in self.system.on_demand_instance_classes() {
                    if let Some(perf) =
                        self.system
                            .performances
                            .scaled(&d.id, &app.id, self.timeslot_unit)
                    {
                        terms.push((x_var(&app.id, &d.id, key.hash), perf));
                    }
                }
                model.add_constraint(
                    format!("perf__{}__{:x}", app.id.0, key.hash),
                    terms,
                    relation,
                    workload,
                );
            }
        }
    }

    fn add_limit_instances_per_class(&self, model: &mut LpModel) {
        for r in self.system.reserved_instance_classes() {
            if !r.has_vm_cap() {
                continue;
            }
            let terms: Vec<_> = self
                .system
                .apps
                .iter()
                .map(|a| (y_var(&a.id, &r.id), 1.0))
                .collect();
            model.add_constraint(
                format!("cap_class__{}", r.id.0),
                terms,
                Relation::Le,
                r.max_vms as f64,
            );
        }
        for d in self.system.on_demand_instance_classes() {
            if !d.has_vm_cap() {
                continue;
            }
            for key in self.histogram.keys() {
                let terms: Vec<_> = self
                    .system
                    .apps
                    .iter()
                    .map(|a| (x_var(&a.id, &d.id, key.hash), 1.0))
                    .collect();
                model.add_constraint(
                    format!("cap_class__{}__{:x}", d.id.0, key.hash),
                    terms,
                    Relation::Le,
                    d.max_vms as f64,
                );
            }
        }
    }

    fn add_set_fixed_reserved(
        &self,
        model: &mut LpModel,
        fixed: &ReservedAllocation,
    ) -> Result<(), MallooviaError> {
        for r in self.system.reserved_instance_classes() {
            let value = fixed.get(&r.id).ok_or_else(|| {
                MallooviaError::InvalidProblem(format!(
                    "no preallocation given for reserved instance class '{}'",
                    r.id
                ))
            })?;
            let terms: Vec<_> = self
                .system
                .apps
                .iter()
                .map(|a| (y_var(&a.id, &r.id), 1.0))
                .collect();
            model.add_constraint(
                format!("fixed_reserved__{}", r.id.0),
                terms,
                Relation::Eq,
                value,
            );
        }
        Ok(())
    }

    /// Guided-mode on-demand lower bound (§4.3 item 3): for every on-demand
    /// class named in `floor`, `sum_a X[a,d,w] >= floor[d]` in every
    /// timeslot key. Silently skips classes `floor` doesn't name, unlike
    /// `add_set_fixed_reserved`, since a Guided preallocation need not cover
    /// every on-demand class.
    fn add_on_demand_floor(&self, model: &mut LpModel, floor: &ReservedAllocation) {
        for d in self.system.on_demand_instance_classes() {
            let Some(value) = floor.get(&d.id) else {
                continue;
            };
            for key in self.histogram.keys() {
                let terms: Vec<_> = self
                    .system
                    .apps
                    .iter()
                    .map(|a| (x_var(&a.id, &d.id, key.hash), 1.0))
                    .collect();
                model.add_constraint(
                    format!("floor_demand__{}__{:x}", d.id.0, key.hash),
                    terms,
                    Relation::Ge,
                    value,
                );
            }
        }
    }

    fn add_limit_instances_per_limiting_set(&self, model: &mut LpModel) {
        for ls in &self.system.limiting_sets {
            if !ls.has_vm_cap() {
                continue;
            }
            let members = self.members_of(&ls.id);
            for key in self.histogram.keys() {
                let terms = self.vm_terms(&members, key.hash);
                if terms.is_empty() {
                    continue;
                }
                model.add_constraint(
                    format!("cap_ls__{}__{:x}", ls.id.0, key.hash),
                    terms,
                    Relation::Le,
                    ls.max_vms as f64,
                );
            }
        }
    }

    fn add_limit_cores_per_limiting_set(&self, model: &mut LpModel) {
        for ls in &self.system.limiting_sets {
            if !ls.has_core_cap() {
                continue;
            }
            let members = self.members_of(&ls.id);
            for key in self.histogram.keys() {
                let terms = self.core_terms(&members, key.hash);
                if terms.is_empty() {
                    continue;
                }
                model.add_constraint(
                    format!("cap_ls_cores__{}__{:x}", ls.id.0, key.hash),
                    terms,
                    Relation::Le,
                    ls.max_cores as f64,
                );
            }
        }
    }

    fn members_of(&self, ls: &malloovia_core::LimitingSetId) -> Vec<&InstanceClass> {
        self.system
            .instance_classes
            .iter()
            .filter(|ic| ic.limiting_sets.contains(ls))
            .collect()
    }

    fn vm_terms(&self, members: &[&InstanceClass], key_hash: u64) -> Vec<(String, f64)> {
        let mut terms = Vec::new();
        for ic in members {
            for app in &self.system.apps {
                let name = if ic.is_reserved {
                    y_var(&app.id, &ic.id)
                } else {
                    x_var(&app.id, &ic.id, key_hash)
                };
                terms.push((name, 1.0));
            }
        }
        terms
    }

    fn core_terms(&self, members: &[&InstanceClass], key_hash: u64) -> Vec<(String, f64)> {
        let mut terms = Vec::new();
        for ic in members {
            for app in &self.system.apps {
                let name = if ic.is_reserved {
                    y_var(&app.id, &ic.id)
                } else {
                    x_var(&app.id, &ic.id, key_hash)
                };
                terms.push((name, ic.cores as f64));
            }
        }
        terms
    }

    /// Total reserved VMs per class, summed over apps.
    pub fn reserved_allocation(
        &self,
        values: &HashMap<String, f64>,
    ) -> Result<ReservedAllocation, MallooviaError> {
        let mut instance_classes = Vec::new();
        let mut vms_number = Vec::new();
        for r in self.system.reserved_instance_classes() {
            let mut total = 0.0;
            for app in &self.system.apps {
                let name = y_var(&app.id, &r.id);
                total += value_of(values, &name)?;
            }
            instance_classes.push(r.id.clone());
            vms_number.push(total);
        }
        Ok(ReservedAllocation {
            instance_classes,
            vms_number,
        })
    }

    /// Full per-(key, app, instance-class) VM allocation. Per §4.3, the ic
    /// axis lists reserved classes first, then on-demand, regardless of
    /// their declaration order in the problem document.
    pub fn allocation(&self, values: &HashMap<String, f64>) -> Result<AllocationInfo, MallooviaError> {
        let apps: Vec<AppId> = self.system.apps.iter().map(|a| a.id.clone()).collect();
        let ordered_ics: Vec<&InstanceClass> = self
            .system
            .reserved_instance_classes()
            .chain(self.system.on_demand_instance_classes())
            .collect();
        let instance_classes: Vec<InstanceClassId> =
            ordered_ics.iter().map(|ic| ic.id.clone()).collect();

        let mut values_out = Vec::with_capacity(self.histogram.len());
        let mut repeats = Vec::with_capacity(self.histogram.len());
        for (key, count) in self.histogram.iter() {
            let mut per_app = Vec::with_capacity(apps.len());
            for app in &self.system.apps {
                let mut per_ic = Vec::with_capacity(instance_classes.len());
                for ic in &ordered_ics {
                    let name = if ic.is_reserved {
                        y_var(&app.id, &ic.id)
                    } else {
                        x_var(&app.id, &ic.id, key.hash)
                    };
                    per_ic.push(value_of(values, &name)?);
                }
                per_app.push(per_ic);
            }
            values_out.push(per_app);
            repeats.push(count);
        }
        Ok(AllocationInfo {
            apps,
            instance_classes,
            units: AllocationUnits::Vms,
            values: values_out,
            repeats,
        })
    }

    /// Projects a solved model's variable assignment through the
    /// cost-minimizing objective, regardless of which LP actually produced
    /// it. Used by Phase II (§4.7) to cost the dual fallback's allocation.
    pub fn cost(&self, values: &HashMap<String, f64>) -> Result<f64, MallooviaError> {
        let period = self.histogram.total() as f64;
        let mut total = 0.0;
        for app in &self.system.apps {
            for r in self.system.reserved_instance_classes() {
                total += value_of(values, &y_var(&app.id, &r.id))?
                    * r.scaled_price(self.timeslot_unit)
                    * period;
            }
            for d in self.system.on_demand_instance_classes() {
                let price = d.scaled_price(self.timeslot_unit);
                for (key, count) in self.histogram.iter() {
                    total +=
                        value_of(values, &x_var(&app.id, &d.id, key.hash))? * price * count as f64;
                }
            }
        }
        Ok(total)
    }
}

fn value_of(values: &HashMap<String, f64>, name: &str) -> Result<f64, MallooviaError> {
    values.get(name).copied().ok_or_else(|| {
        MallooviaError::InternalInvariantViolated(format!(
            "solver returned no value for variable '{name}'"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use malloovia_core::{
        App, Histogram, InstanceClass, LimitingSet, LimitingSetId, PerformanceTable,
        Problem, Workload,
    };

    fn sample_system() -> (System, Histogram) {
        let ls = LimitingSet {
            id: LimitingSetId("ls0".into()),
            name: "region".into(),
            max_vms: 0,
            max_cores: 0,
        };
        let reserved = InstanceClass {
            id: InstanceClassId("m1.reserved".into()),
            name: "m1.reserved".into(),
            limiting_sets: vec![ls.id.clone()],
            max_vms: 20,
            price: 80.0,
            price_time_unit: TimeUnit::Hour,
            cores: 1,
            is_reserved: true,
            is_private: false,
        };
        let on_demand = InstanceClass {
            id: InstanceClassId("m1.demand".into()),
            name: "m1.demand".into(),
            limiting_sets: vec![ls.id.clone()],
            max_vms: 0,
            price: 100.0,
            price_time_unit: TimeUnit::Hour,
            cores: 1,
            is_reserved: false,
            is_private: false,
        };
        let app = App {
            id: AppId("app0".into()),
            name: "app0".into(),
        };
        let mut perf = HashMap::new();
        perf.insert((reserved.id.clone(), app.id.clone()), 1000.0);
        perf.insert((on_demand.id.clone(), app.id.clone()), 1000.0);
        let problem = Problem {
            id: "p0".into(),
            name: "problem".into(),
            workloads: vec![Workload {
                app: app.id.clone(),
                values: vec![2000.0, 2000.0],
                time_unit: TimeUnit::Hour,
            }],
            instance_classes: vec![reserved, on_demand],
            limiting_sets: vec![ls],
            performances: PerformanceTable::new(TimeUnit::Hour, perf),
        };
        let system = System::from_problem(&problem);
        let histogram = Histogram::build(&problem.workloads, &system.apps).unwrap();
        (system, histogram)
    }

    #[test]
    fn declares_one_y_per_app_reserved_pair_and_one_x_per_app_demand_key() {
        let (system, histogram) = sample_system();
        let builder = LpBuilder::new(&system, &histogram, TimeUnit::Hour, false);
        let model = builder.build_minimize_cost(None, None).unwrap();
        assert_eq!(model.variables.len(), 2); // one Y, one X (single histogram key)
    }

    #[test]
    fn objective_scales_price_to_timeslot_unit() {
        let (system, histogram) = sample_system();
        let builder = LpBuilder::new(&system, &histogram, TimeUnit::Hour, false);
        let model = builder.build_minimize_cost(None, None).unwrap();
        let y = y_var(&AppId("app0".into()), &InstanceClassId("m1.reserved".into()));
        // price (80) * period length (2 timeslots in `sample_system`).
        assert_eq!(model.objective.get(&y), 160.0);
    }

    #[test]
    fn performance_restriction_uses_ge_for_min_cost() {
        let (system, histogram) = sample_system();
        let builder = LpBuilder::new(&system, &histogram, TimeUnit::Hour, false);
        let model = builder.build_minimize_cost(None, None).unwrap();
        let perf_constraints: Vec<_> = model
            .constraints
            .iter()
            .filter(|c| c.name.starts_with("perf__"))
            .collect();
        assert_eq!(perf_constraints.len(), 1);
        assert_eq!(perf_constraints[0].relation, Relation::Ge);
        assert_eq!(perf_constraints[0].rhs, 2000.0);
    }

    #[test]
    fn fixed_reserved_adds_equality_constraint() {
        let (system, histogram) = sample_system();
        let builder = LpBuilder::new(&system, &histogram, TimeUnit::Hour, false);
        let fixed = ReservedAllocation {
            instance_classes: vec![InstanceClassId("m1.reserved".into())],
            vms_number: vec![2.0],
        };
        let model = builder.build_minimize_cost(Some(&fixed), None).unwrap();
        let fixed_constraint = model
            .constraints
            .iter()
            .find(|c| c.name.starts_with("fixed_reserved__"))
            .unwrap();
        assert_eq!(fixed_constraint.relation, Relation::Eq);
        assert_eq!(fixed_constraint.rhs, 2.0);
    }

    #[test]
    fn on_demand_floor_adds_ge_constraint_per_key() {
        let (system, histogram) = sample_system();
        let builder = LpBuilder::new(&system, &histogram, TimeUnit::Hour, false);
        let floor = ReservedAllocation {
            instance_classes: vec![InstanceClassId("m1.demand".into())],
            vms_number: vec![3.0],
        };
        let model = builder.build_minimize_cost(None, Some(&floor)).unwrap();
        let floor_constraints: Vec<_> = model
            .constraints
            .iter()
            .filter(|c| c.name.starts_with("floor_demand__"))
            .collect();
        assert_eq!(floor_constraints.len(), histogram.keys().len());
        for c in floor_constraints {
            assert_eq!(c.relation, Relation::Ge);
            assert_eq!(c.rhs, 3.0);
        }
    }

    #[test]
    fn reserved_allocation_sums_across_apps() {
        let (system, histogram) = sample_system();
        let builder = LpBuilder::new(&system, &histogram, TimeUnit::Hour, false);
        let mut values = HashMap::new();
        values.insert(
            y_var(&AppId("app0".into()), &InstanceClassId("m1.reserved".into())),
            2.0,
        );
        for key in histogram.keys() {
            values.insert(
                x_var(
                    &AppId("app0".into()),
                    &InstanceClassId("m1.demand".into()),
                    key.hash,
                ),
                0.0,
            );
        }
        let reserved = builder.reserved_allocation(&values).unwrap();
        assert_eq!(reserved.get(&InstanceClassId("m1.reserved".into())), Some(2.0));
    }

    #[test]
    fn allocation_reports_missing_variable_as_invariant_violation() {
        let (system, histogram) = sample_system();
        let builder = LpBuilder::new(&system, &histogram, TimeUnit::Hour, false);
        let values = HashMap::new();
        let err = builder.allocation(&values).unwrap_err();
        assert!(matches!(err, MallooviaError::InternalInvariantViolated(_)));
    }

    #[test]
    fn allocation_lists_reserved_classes_before_on_demand_even_when_declared_after() {
        let ls = LimitingSet {
            id: LimitingSetId("ls0".into()),
            name: "region".into(),
            max_vms: 0,
            max_cores: 0,
        };
        let reserved = InstanceClass {
            id: InstanceClassId("m1.reserved".into()),
            name: "m1.reserved".into(),
            limiting_sets: vec![ls.id.clone()],
            max_vms: 20,
            price: 80.0,
            price_time_unit: TimeUnit::Hour,
            cores: 1,
            is_reserved: true,
            is_private: false,
        };
        let on_demand = InstanceClass {
            id: InstanceClassId("m1.demand".into()),
            name: "m1.demand".into(),
            limiting_sets: vec![ls.id.clone()],
            max_vms: 0,
            price: 100.0,
            price_time_unit: TimeUnit::Hour,
            cores: 1,
            is_reserved: false,
            is_private: false,
        };
        let app = App {
            id: AppId("app0".into()),
            name: "app0".into(),
        };
        let mut perf = HashMap::new();
        perf.insert((reserved.id.clone(), app.id.clone()), 1000.0);
        perf.insert((on_demand.id.clone(), app.id.clone()), 1000.0);
        // On-demand declared before reserved, the opposite of `sample_system`.
        let problem = Problem {
            id: "p0".into(),
            name: "problem".into(),
            workloads: vec![Workload {
                app: app.id.clone(),
                values: vec![2000.0, 2000.0],
                time_unit: TimeUnit::Hour,
            }],
            instance_classes: vec![on_demand, reserved],
            limiting_sets: vec![ls],
            performances: PerformanceTable::new(TimeUnit::Hour, perf),
        };
        let system = System::from_problem(&problem);
        let histogram = Histogram::build(&problem.workloads, &system.apps).unwrap();
        let builder = LpBuilder::new(&system, &histogram, TimeUnit::Hour, false);

        let mut values = HashMap::new();
        values.insert(y_var(&app.id, &InstanceClassId("m1.reserved".into())), 2.0);
        for key in histogram.keys() {
            values.insert(
                x_var(&app.id, &InstanceClassId("m1.demand".into()), key.hash),
                0.0,
            );
        }
        let allocation = builder.allocation(&values).unwrap();
        assert_eq!(
            allocation.instance_classes,
            vec![
                InstanceClassId("m1.reserved".into()),
                InstanceClassId("m1.demand".into()),
            ]
        );
    }
}

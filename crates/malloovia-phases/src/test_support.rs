//! Shared fixtures for the seed scenarios in §8, reused by both phase
//! controllers' test modules.

use std::collections::HashMap;

use malloovia_core::{
    AppId, InstanceClass, InstanceClassId, LimitingSet, LimitingSetId, PerformanceTable, Problem,
    TimeUnit, Workload,
};

/// Scenario B (§8): two apps, one reserved class (price 7) in `ls.reserved`,
/// one on-demand class (price 10) in `ls.demand`, same performances for
/// both classes (app0: 10 rph, app1: 500 rph), 4 timeslots with loads
/// `app0=[30,32,30,30]`, `app1=[1003,1200,1194,1003]`, cap 20 on the
/// reserved limiting set.
pub fn scenario_b_problem() -> Problem {
    let ls_reserved = LimitingSet {
        id: LimitingSetId("ls.reserved".into()),
        name: "reserved region".into(),
        max_vms: 20,
        max_cores: 0,
    };
    let ls_demand = LimitingSet {
        id: LimitingSetId("ls.demand".into()),
        name: "on-demand region".into(),
        max_vms: 0,
        max_cores: 0,
    };
    let reserved = InstanceClass {
        id: InstanceClassId("m1.reserved".into()),
        name: "m1.reserved".into(),
        limiting_sets: vec![ls_reserved.id.clone()],
        max_vms: 20,
        price: 7.0,
        price_time_unit: TimeUnit::Hour,
        cores: 1,
        is_reserved: true,
        is_private: false,
    };
    let on_demand = InstanceClass {
        id: InstanceClassId("m1.demand".into()),
        name: "m1.demand".into(),
        limiting_sets: vec![ls_demand.id.clone()],
        max_vms: 20,
        price: 10.0,
        price_time_unit: TimeUnit::Hour,
        cores: 1,
        is_reserved: false,
        is_private: false,
    };
    let mut perf = HashMap::new();
    perf.insert((reserved.id.clone(), AppId("app0".into())), 10.0);
    perf.insert((reserved.id.clone(), AppId("app1".into())), 500.0);
    perf.insert((on_demand.id.clone(), AppId("app0".into())), 10.0);
    perf.insert((on_demand.id.clone(), AppId("app1".into())), 500.0);

    Problem {
        id: "b".into(),
        name: "scenario-b".into(),
        workloads: vec![
            Workload {
                app: AppId("app0".into()),
                values: vec![30.0, 32.0, 30.0, 30.0],
                time_unit: TimeUnit::Hour,
            },
            Workload {
                app: AppId("app1".into()),
                values: vec![1003.0, 1200.0, 1194.0, 1003.0],
                time_unit: TimeUnit::Hour,
            },
        ],
        instance_classes: vec![reserved, on_demand],
        limiting_sets: vec![ls_reserved, ls_demand],
        performances: PerformanceTable::new(TimeUnit::Hour, perf),
    }
}

/// Scenario D (§8): scenario B, but the reserved class now declares 4
/// cores/VM (on-demand: 2) and its limiting set caps total cores at 10 —
/// tighter than the 6 reserved VMs the unconstrained LP would otherwise
/// choose (6 * 4 = 24 > 10), forcing some load onto on-demand instead.
pub fn scenario_d_problem() -> Problem {
    let mut problem = scenario_b_problem();
    for ic in &mut problem.instance_classes {
        ic.cores = if ic.is_reserved { 4 } else { 2 };
    }
    for ls in &mut problem.limiting_sets {
        if ls.id == LimitingSetId("ls.reserved".into()) {
            ls.max_cores = 10;
        }
    }
    problem
}

/// Scenario F (§8): scenario B's problem, but timeslot 1's app0 load spikes
/// to 270 (instead of 32), exceeding what the already-fixed reserved pool
/// plus the on-demand class's VM cap can deliver.
pub fn scenario_f_problem() -> Problem {
    let mut problem = scenario_b_problem();
    problem.workloads[0].values[1] = 270.0;
    problem
}

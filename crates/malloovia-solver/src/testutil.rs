//! A small in-memory MILP solver used only by tests, so the LP builders and
//! the Phase I/II controllers in `malloovia-phases` can be exercised without
//! an installed `cbc` binary (§8 of the design: "a solver-neutral
//! fake/in-memory LP solver... is used for the Phase I/II and LP-builder
//! unit tests themselves").
//!
//! This is a plain Big-M simplex over a dense tableau, wrapped in a
//! branch-and-bound loop for integer variables. It is never used on the
//! production solve path — [`crate::cbc::solve`] is — and is only practical
//! for the small fixtures this workspace's tests build.

use std::collections::HashMap;

use malloovia_core::Status;

use crate::error::SolverResult;
use crate::lp::{LpModel, Relation, Sense, VarKind};
use crate::{SolveOptions, SolveResult};

const BIG_M: f64 = 1.0e7;
const MAX_ITERATIONS: usize = 2000;

struct RelaxationOutcome {
    status: Status,
    objective: f64,
    values: HashMap<String, f64>,
}

/// Solves `model` with the bundled brute-force solver instead of CBC.
pub fn solve(model: &LpModel, _options: &SolveOptions) -> SolverResult<SolveResult> {
    let has_integers = model.variables.iter().any(|v| v.kind == VarKind::Integer);
    if !has_integers {
        return Ok(finish(simplex(model)));
    }
    Ok(branch_and_bound(model))
}

/// [`crate::Solver`] wrapping [`solve`], for callers that are generic over
/// the solver backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForceSolver;

impl crate::Solver for BruteForceSolver {
    fn solve(&self, model: &LpModel, options: &SolveOptions) -> SolverResult<SolveResult> {
        solve(model, options)
    }
}

fn finish(outcome: RelaxationOutcome) -> SolveResult {
    let is_optimal = outcome.status == Status::Optimal;
    SolveResult {
        status: outcome.status,
        objective: is_optimal.then_some(outcome.objective),
        variable_values: outcome.values,
        best_bound: is_optimal.then_some(outcome.objective),
    }
}

/// Depth-first branch-and-bound over the integer-declared variables,
/// re-solving the LP relaxation (via [`simplex`]) at every node. Adequate
/// only for the tiny fixtures this workspace's tests build.
fn branch_and_bound(model: &LpModel) -> SolveResult {
    let integer_vars: Vec<String> = model
        .variables
        .iter()
        .filter(|v| v.kind == VarKind::Integer)
        .map(|v| v.name.clone())
        .collect();
    let minimize = matches!(model.sense, Sense::Minimize);

    let mut best: Option<(f64, HashMap<String, f64>)> = None;
    let mut any_relaxation_feasible = false;
    let mut stack = vec![model.clone()];

    while let Some(node) = stack.pop() {
        let relaxation = simplex(&node);
        if matches!(relaxation.status, Status::Infeasible | Status::Unknown) {
            continue;
        }
        any_relaxation_feasible = true;

        if let Some((incumbent, _)) = &best {
            let dominated = if minimize {
                relaxation.objective >= incumbent - 1e-9
            } else {
                relaxation.objective <= incumbent + 1e-9
            };
            if dominated {
                continue;
            }
        }

        let fractional = integer_vars.iter().find_map(|name| {
            let value = *relaxation.values.get(name).unwrap_or(&0.0);
            let rounded = value.round();
            if (value - rounded).abs() > 1e-6 {
                Some((name.clone(), value))
            } else {
                None
            }
        });

        match fractional {
            None => {
                let better = match &best {
                    None => true,
                    Some((incumbent, _)) => {
                        if minimize {
                            relaxation.objective < incumbent - 1e-9
                        } else {
                            relaxation.objective > incumbent + 1e-9
                        }
                    }
                };
                if better {
                    best = Some((relaxation.objective, relaxation.values));
                }
            }
            Some((name, value)) => {
                let mut down = node.clone();
                down.add_constraint(
                    format!("bb_le_{name}"),
                    vec![(name.clone(), 1.0)],
                    Relation::Le,
                    value.floor(),
                );
                let mut up = node.clone();
                up.add_constraint(
                    format!("bb_ge_{name}"),
                    vec![(name.clone(), 1.0)],
                    Relation::Ge,
                    value.ceil(),
                );
                stack.push(down);
                stack.push(up);
            }
        }
    }

    match best {
        Some((objective, values)) => SolveResult {
            status: Status::Optimal,
            objective: Some(objective),
            variable_values: values,
            best_bound: Some(objective),
        },
        None => SolveResult {
            status: if any_relaxation_feasible {
                Status::IntegerInfeasible
            } else {
                Status::Infeasible
            },
            objective: None,
            variable_values: HashMap::new(),
            best_bound: None,
        },
    }
}

struct NormalizedRow {
    coeffs: Vec<f64>,
    relation: Relation,
    rhs: f64,
}

/// Solves the continuous relaxation of `model` with a Big-M simplex.
fn simplex(model: &LpModel) -> RelaxationOutcome {
    let var_names: Vec<String> = model.variables.iter().map(|v| v.name.clone()).collect();
    let index: HashMap<&str, usize> = var_names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    let n = var_names.len();

    let mut rows = Vec::with_capacity(model.constraints.len());
    for c in &model.constraints {
        let mut coeffs = vec![0.0; n];
        for (name, coeff) in &c.terms {
            if let Some(&i) = index.get(name.as_str()) {
                coeffs[i] += coeff;
            }
        }
        let mut relation = c.relation;
        let mut rhs = c.rhs;
        if rhs < 0.0 {
            for v in coeffs.iter_mut() {
                *v = -*v;
            }
            rhs = -rhs;
            relation = match relation {
                Relation::Le => Relation::Ge,
                Relation::Ge => Relation::Le,
                Relation::Eq => Relation::Eq,
            };
        }
        rows.push(NormalizedRow {
            coeffs,
            relation,
            rhs,
        });
    }

    let num_rows = rows.len();
    let mut extra_cols: Vec<Vec<f64>> = Vec::new();
    let mut extra_cost: Vec<f64> = Vec::new();
    let mut basis = vec![0usize; num_rows];

    for (r, row) in rows.iter().enumerate() {
        match row.relation {
            Relation::Le => {
                let mut col = vec![0.0; num_rows];
                col[r] = 1.0;
                extra_cols.push(col);
                extra_cost.push(0.0);
                basis[r] = n + extra_cols.len() - 1;
            }
            Relation::Ge => {
                let mut surplus = vec![0.0; num_rows];
                surplus[r] = -1.0;
                extra_cols.push(surplus);
                extra_cost.push(0.0);

                let mut artificial = vec![0.0; num_rows];
                artificial[r] = 1.0;
                extra_cols.push(artificial);
                extra_cost.push(BIG_M);
                basis[r] = n + extra_cols.len() - 1;
            }
            Relation::Eq => {
                let mut artificial = vec![0.0; num_rows];
                artificial[r] = 1.0;
                extra_cols.push(artificial);
                extra_cost.push(BIG_M);
                basis[r] = n + extra_cols.len() - 1;
            }
        }
    }

    let total_cols = n + extra_cols.len();
    let mut tableau = vec![vec![0.0; total_cols + 1]; num_rows];
    for (r, row) in rows.iter().enumerate() {
        tableau[r][..n].copy_from_slice(&row.coeffs);
        for (ec, col) in extra_cols.iter().enumerate() {
            tableau[r][n + ec] = col[r];
        }
        tableau[r][total_cols] = row.rhs;
    }

    let minimize = matches!(model.sense, Sense::Minimize);
    let mut cost_row = vec![0.0; total_cols + 1];
    for (name, coeff) in model.objective.iter() {
        if let Some(&i) = index.get(name) {
            cost_row[i] = if minimize { coeff } else { -coeff };
        }
    }
    for (ec, cost) in extra_cost.iter().enumerate() {
        cost_row[n + ec] = *cost;
    }

    for r in 0..num_rows {
        let basic_col = basis[r];
        let cb = cost_row[basic_col];
        if cb != 0.0 {
            for c in 0..=total_cols {
                cost_row[c] -= cb * tableau[r][c];
            }
        }
    }

    for _ in 0..MAX_ITERATIONS {
        let mut entering = None;
        let mut best_val = -1e-9;
        for c in 0..total_cols {
            if cost_row[c] < best_val {
                best_val = cost_row[c];
                entering = Some(c);
            }
        }
        let Some(entering) = entering else { break };

        let mut leaving = None;
        let mut best_ratio = f64::INFINITY;
        for r in 0..num_rows {
            let a = tableau[r][entering];
            if a > 1e-9 {
                let ratio = tableau[r][total_cols] / a;
                let better = ratio < best_ratio - 1e-9
                    || (ratio < best_ratio + 1e-9
                        && leaving.is_some_and(|l: usize| basis[r] < basis[l]));
                if leaving.is_none() || better {
                    best_ratio = ratio;
                    leaving = Some(r);
                }
            }
        }
        let Some(leaving) = leaving else {
            return RelaxationOutcome {
                status: Status::Unknown,
                objective: 0.0,
                values: HashMap::new(),
            };
        };

        let pivot = tableau[leaving][entering];
        for c in 0..=total_cols {
            tableau[leaving][c] /= pivot;
        }
        for r in 0..num_rows {
            if r == leaving {
                continue;
            }
            let factor = tableau[r][entering];
            if factor.abs() > 1e-12 {
                for c in 0..=total_cols {
                    tableau[r][c] -= factor * tableau[leaving][c];
                }
            }
        }
        let factor = cost_row[entering];
        if factor.abs() > 1e-12 {
            for c in 0..=total_cols {
                cost_row[c] -= factor * tableau[leaving][c];
            }
        }
        basis[leaving] = entering;
    }

    let artificial_start = n;
    let is_artificial = |col: usize| col >= artificial_start && extra_cost[col - n] >= BIG_M - 1.0;
    for (r, &b) in basis.iter().enumerate() {
        if is_artificial(b) && tableau[r][total_cols] > 1e-6 {
            return RelaxationOutcome {
                status: Status::Infeasible,
                objective: 0.0,
                values: HashMap::new(),
            };
        }
    }

    let mut values = HashMap::new();
    for (i, name) in var_names.iter().enumerate() {
        let mut v = 0.0;
        for (r, &b) in basis.iter().enumerate() {
            if b == i {
                v = tableau[r][total_cols];
            }
        }
        values.insert(name.clone(), v);
    }

    let mut objective = 0.0;
    for (name, coeff) in model.objective.iter() {
        objective += coeff * values.get(name).copied().unwrap_or(0.0);
    }

    RelaxationOutcome {
        status: Status::Optimal,
        objective,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::VarKind;

    #[test]
    fn minimizes_simple_continuous_lp() {
        let mut model = LpModel::new("t", Sense::Minimize);
        model.add_variable("x", VarKind::Continuous);
        model.objective.add("x", 2.0);
        model.add_constraint("c1", vec![("x".into(), 1.0)], Relation::Ge, 3.0);
        let result = solve(&model, &SolveOptions::default()).unwrap();
        assert_eq!(result.status, Status::Optimal);
        assert!((result.objective.unwrap() - 6.0).abs() < 1e-6);
        assert!((result.variable_values["x"] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn maximizes_simple_continuous_lp() {
        let mut model = LpModel::new("t", Sense::Maximize);
        model.add_variable("x", VarKind::Continuous);
        model.objective.add("x", 1.0);
        model.add_constraint("c1", vec![("x".into(), 1.0)], Relation::Le, 5.0);
        let result = solve(&model, &SolveOptions::default()).unwrap();
        assert_eq!(result.status, Status::Optimal);
        assert!((result.objective.unwrap() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn detects_infeasible_lp() {
        let mut model = LpModel::new("t", Sense::Minimize);
        model.add_variable("x", VarKind::Continuous);
        model.objective.add("x", 1.0);
        model.add_constraint("c1", vec![("x".into(), 1.0)], Relation::Le, 1.0);
        model.add_constraint("c2", vec![("x".into(), 1.0)], Relation::Ge, 5.0);
        let result = solve(&model, &SolveOptions::default()).unwrap();
        assert_eq!(result.status, Status::Infeasible);
    }

    #[test]
    fn integer_branch_and_bound_rounds_up_to_feasible_integer() {
        let mut model = LpModel::new("t", Sense::Minimize);
        model.add_variable("x", VarKind::Integer);
        model.objective.add("x", 1.0);
        // 2x >= 5 forces x >= 2.5, optimal integer is x=3
        model.add_constraint("c1", vec![("x".into(), 2.0)], Relation::Ge, 5.0);
        let result = solve(&model, &SolveOptions::default()).unwrap();
        assert_eq!(result.status, Status::Optimal);
        assert_eq!(result.objective, Some(3.0));
        assert_eq!(result.variable_values["x"], 3.0);
    }
}

//! Solver-neutral linear-programming model.
//!
//! [`LpModel`] is the in-memory representation both LP builders target; the
//! CBC adapter (`crate::cbc`) renders it to CBC's native `.lp` file format.
//! This mirrors the way `gat-solver-common` keeps its `ProblemBatch`
//! independent from any particular solver backend.

use std::collections::BTreeMap;
use std::fmt;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Whether a variable is restricted to integers or allowed to be continuous
/// (the `relaxed` flag on the LP builders, §4.3/§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Integer,
    Continuous,
}

/// A single non-negative decision variable, `Y[a,r]` or `X[a,d,w]` in the
/// design's notation.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
}

/// Comparison used by a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "=",
        };
        write!(f, "{s}")
    }
}

/// A linear constraint `sum(coeff * var) <relation> rhs`.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub name: String,
    pub terms: Vec<(String, f64)>,
    pub relation: Relation,
    pub rhs: f64,
}

/// A solver-neutral linear program: an objective over a set of named
/// variables plus a list of linear constraints. Iteration order of
/// `variables` and `constraints` is insertion order, which is what makes
/// the LP builders in `crate::builder` produce byte-identical models for
/// identical inputs (§4.3's determinism requirement).
#[derive(Debug, Clone)]
pub struct LpModel {
    pub name: String,
    pub sense: Sense,
    pub variables: Vec<Variable>,
    pub objective: BTreeMapLike,
    pub constraints: Vec<Constraint>,
}

/// Objective coefficients keyed by variable name. A thin wrapper (rather
/// than a bare `HashMap`) so the objective's insertion order can be
/// recovered for deterministic LP-file rendering.
#[derive(Debug, Clone, Default)]
pub struct BTreeMapLike {
    order: Vec<String>,
    coeffs: BTreeMap<String, f64>,
}

impl BTreeMapLike {
    pub fn add(&mut self, var: &str, coeff: f64) {
        if coeff == 0.0 {
            return;
        }
        if !self.coeffs.contains_key(var) {
            self.order.push(var.to_string());
        }
        *self.coeffs.entry(var.to_string()).or_insert(0.0) += coeff;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.coeffs[name]))
    }

    pub fn get(&self, var: &str) -> f64 {
        self.coeffs.get(var).copied().unwrap_or(0.0)
    }
}

impl LpModel {
    pub fn new(name: impl Into<String>, sense: Sense) -> Self {
        Self {
            name: name.into(),
            sense,
            variables: Vec::new(),
            objective: BTreeMapLike::default(),
            constraints: Vec::new(),
        }
    }

    pub fn add_variable(&mut self, name: impl Into<String>, kind: VarKind) {
        self.variables.push(Variable {
            name: name.into(),
            kind,
        });
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(String, f64)>,
        relation: Relation,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            terms,
            relation,
            rhs,
        });
    }
}

//! Result types returned by the Phase I and Phase II controllers.

use std::time::Duration;

use malloovia_core::{AllocationInfo, MallooviaError, ReservedAllocation, Status};
use serde::{Deserialize, Serialize};

/// Wall-clock spent on one controller step: building the LP, then solving
/// it. Kept apart since LP construction is pure Rust while solving shells
/// out to `cbc` — splitting them out makes it possible to tell a slow
/// builder from a slow solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolvingStats {
    #[serde(with = "duration_secs")]
    pub creation_time: Duration,
    #[serde(with = "duration_secs")]
    pub solving_time: Duration,
}

/// Sum of [`SolvingStats`] over every timeslot of a Phase II run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSolvingStats {
    #[serde(with = "duration_secs")]
    pub creation_time: Duration,
    #[serde(with = "duration_secs")]
    pub solving_time: Duration,
}

impl GlobalSolvingStats {
    pub fn add(&mut self, stats: &SolvingStats) {
        self.creation_time += stats.creation_time;
        self.solving_time += stats.solving_time;
    }
}

/// Stats carried alongside a Phase I solution.
///
/// `gcd`/`gcd_multiplier` mirror the source's GCD-based problem
/// quantization fields; the transform itself is out of scope here (open
/// question, see DESIGN.md), so they are always `false`/`1.0` and nothing
/// downstream relies on them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MallooviaStats {
    pub solving_stats: SolvingStats,
    pub status: Status,
    pub gcd: bool,
    pub gcd_multiplier: f64,
}

impl Default for MallooviaStats {
    fn default() -> Self {
        Self {
            solving_stats: SolvingStats::default(),
            status: Status::Unsolved,
            gcd: false,
            gcd_multiplier: 1.0,
        }
    }
}

/// Phase I's result: the reserved allocation (valid for the whole period)
/// plus the full per-histogram-key allocation it was derived from. Both
/// are `None` when `stats.status` is not optimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionI {
    pub stats: MallooviaStats,
    pub reserved_allocation: Option<ReservedAllocation>,
    pub allocation: Option<AllocationInfo>,
    pub cost: Option<f64>,
}

impl SolutionI {
    /// The reserved allocation, or `NotOptimal` if `stats.status` isn't
    /// `Optimal` (§7 — callers reading a result must not assume it solved).
    pub fn reserved_allocation(&self) -> Result<&ReservedAllocation, MallooviaError> {
        self.reserved_allocation
            .as_ref()
            .ok_or(MallooviaError::NotOptimal(self.stats.status))
    }

    /// The full per-histogram-key allocation, or `NotOptimal`.
    pub fn allocation(&self) -> Result<&AllocationInfo, MallooviaError> {
        self.allocation
            .as_ref()
            .ok_or(MallooviaError::NotOptimal(self.stats.status))
    }

    /// The total cost, or `NotOptimal`.
    pub fn cost(&self) -> Result<f64, MallooviaError> {
        self.cost.ok_or(MallooviaError::NotOptimal(self.stats.status))
    }
}

/// Phase II's result: one allocation array spanning every timeslot
/// (`repeats` all-ones), the aggregate cost and status, and the
/// per-timeslot status so callers can see which timeslots fell back to
/// the dual LP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionII {
    pub stats: GlobalSolvingStats,
    pub status: Status,
    pub allocation: Option<AllocationInfo>,
    pub cost: Option<f64>,
    pub per_timeslot_status: Vec<Status>,
    pub per_timeslot_cost: Vec<Option<f64>>,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_secs_f64().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs_f64(f64::deserialize(d)?))
    }
}

//! Workload histogram compression (§4.2 of the design): collapses a
//! length-`T` sequence of per-app workload tuples into a mapping from
//! tuple to occurrence count, so Phase I only has to build one LP
//! constraint set per distinct tuple instead of one per timeslot.

use crate::error::MallooviaError;
use crate::model::{App, Workload};
use crate::ordered_float::OrderedF64;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// A per-app tuple of workload values observed at a single timeslot, in
/// `System.apps` order.
pub type WorkloadTuple = Vec<f64>;

fn hashable(tuple: &[f64]) -> Vec<OrderedF64> {
    tuple.iter().copied().map(OrderedF64::from).collect()
}

/// Compact, deterministic 64-bit hash of a workload tuple, used to generate
/// bounded-length LP variable names instead of embedding the tuple's text
/// form (which grows with the number of apps).
pub fn stable_key_hash(tuple: &[f64]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    hashable(tuple).hash(&mut hasher);
    hasher.finish()
}

/// A histogram key: the workload tuple plus the stable hash used to name
/// its LP variables.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramKey {
    pub tuple: WorkloadTuple,
    pub hash: u64,
}

/// Mapping `w -> count`, preserving first-seen order of distinct tuples
/// (iteration order matters for reproducible LPs, per §4.3's determinism
/// requirement).
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    keys: Vec<HistogramKey>,
    counts: Vec<u64>,
    index: HashMap<Vec<OrderedF64>, usize>,
}

impl Histogram {
    /// Builds a histogram from a tuple of [`Workload`]s, reordered to match
    /// `apps`. All workloads must share the same length `T`.
    pub fn build(workloads: &[Workload], apps: &[App]) -> Result<Self, MallooviaError> {
        let mut lengths = workloads.iter().map(Workload::len);
        let t = lengths.next().unwrap_or(0);
        if let Some(mismatch) = lengths.find(|len| *len != t) {
            return Err(MallooviaError::InconsistentWorkloadLengths(format!(
                "expected length {t}, found {mismatch}"
            )));
        }

        let by_app: HashMap<_, _> = workloads.iter().map(|w| (&w.app, w)).collect();

        let mut histogram = Histogram::default();
        for timeslot in 0..t {
            let mut tuple = Vec::with_capacity(apps.len());
            for app in apps {
                let value = by_app
                    .get(&app.id)
                    .map(|w| w.values[timeslot])
                    .unwrap_or(0.0);
                tuple.push(value);
            }
            histogram.record(tuple);
        }
        Ok(histogram)
    }

    fn record(&mut self, tuple: WorkloadTuple) {
        let key = hashable(&tuple);
        match self.index.get(&key) {
            Some(&idx) => self.counts[idx] += 1,
            None => {
                let hash = stable_key_hash(&tuple);
                self.index.insert(key, self.keys.len());
                self.keys.push(HistogramKey { tuple, hash });
                self.counts.push(1);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Total of all counts; equals `T` by construction.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Keys in first-seen (deterministic) order.
    pub fn keys(&self) -> &[HistogramKey] {
        &self.keys
    }

    /// Iterates `(key, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&HistogramKey, u64)> {
        self.keys.iter().zip(self.counts.iter().copied())
    }

    pub fn count_of(&self, tuple: &[f64]) -> Option<u64> {
        self.index
            .get(&hashable(tuple))
            .map(|&idx| self.counts[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppId;
    use crate::units::TimeUnit;

    fn app(id: &str) -> App {
        App {
            id: AppId(id.to_string()),
            name: id.to_string(),
        }
    }

    fn workload(app_id: &str, values: &[f64]) -> Workload {
        Workload {
            app: AppId(app_id.to_string()),
            values: values.to_vec(),
            time_unit: TimeUnit::Hour,
        }
    }

    #[test]
    fn histogram_completeness() {
        let apps = vec![app("app0"), app("app1")];
        let workloads = vec![
            workload("app0", &[30.0, 32.0, 30.0, 30.0]),
            workload("app1", &[1003.0, 1200.0, 1194.0, 1003.0]),
        ];
        let histogram = Histogram::build(&workloads, &apps).unwrap();
        assert_eq!(histogram.total(), 4);
        assert_eq!(histogram.len(), 3);
        assert_eq!(histogram.count_of(&[30.0, 1003.0]), Some(2));
        assert_eq!(histogram.count_of(&[32.0, 1200.0]), Some(1));
        assert_eq!(histogram.count_of(&[30.0, 1194.0]), Some(1));
    }

    #[test]
    fn mismatched_lengths_error() {
        let apps = vec![app("app0"), app("app1")];
        let workloads = vec![workload("app0", &[1.0, 2.0]), workload("app1", &[1.0])];
        let err = Histogram::build(&workloads, &apps).unwrap_err();
        assert!(matches!(
            err,
            MallooviaError::InconsistentWorkloadLengths(_)
        ));
    }

    #[test]
    fn stable_hash_is_deterministic() {
        let a = stable_key_hash(&[1.0, 2.0, 3.0]);
        let b = stable_key_hash(&[1.0, 2.0, 3.0]);
        assert_eq!(a, b);
        let c = stable_key_hash(&[1.0, 2.0, 3.5]);
        assert_ne!(a, c);
    }

    #[test]
    fn order_is_first_seen_not_hash_order() {
        let apps = vec![app("app0")];
        let workloads = vec![workload("app0", &[3.0, 1.0, 3.0, 2.0])];
        let histogram = Histogram::build(&workloads, &apps).unwrap();
        let firsts: Vec<f64> = histogram.keys().iter().map(|k| k.tuple[0]).collect();
        assert_eq!(firsts, vec![3.0, 1.0, 2.0]);
    }
}

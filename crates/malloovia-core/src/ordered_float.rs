//! A thin, hashable wrapper around `f64`.
//!
//! Workload values and LP variable values need to be used as map keys (the
//! workload histogram keys on the per-app tuple) even though `f64` is not
//! `Eq`/`Hash`. `OrderedF64` compares and hashes by bit pattern, which is
//! sufficient here: values come from problem documents or LP solutions, not
//! from arithmetic that could produce distinct NaN payloads we need to
//! distinguish.

use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedF64(pub f64);

impl Eq for OrderedF64 {}

impl Hash for OrderedF64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl From<f64> for OrderedF64 {
    fn from(value: f64) -> Self {
        OrderedF64(value)
    }
}

impl From<OrderedF64> for f64 {
    fn from(value: OrderedF64) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equal_values_hash_equal() {
        let mut set = HashSet::new();
        set.insert(OrderedF64(1.5));
        assert!(set.contains(&OrderedF64(1.5)));
        assert!(!set.contains(&OrderedF64(1.6)));
    }
}

//! # malloovia-core: domain model for cloud VM allocation
//!
//! Provides the immutable value types describing a malloovia allocation
//! problem — apps, limiting sets, instance classes, performance tables,
//! workloads — plus the time-unit conversions and workload-histogram
//! compression shared by the LP builders and phase controllers in the
//! `malloovia-solver` and `malloovia-phases` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use malloovia_core::{App, AppId, Histogram, System, Workload, TimeUnit};
//!
//! let app = App { id: AppId("app0".into()), name: "app0".into() };
//! let workload = Workload {
//!     app: app.id.clone(),
//!     values: vec![2000.0, 2000.0],
//!     time_unit: TimeUnit::Hour,
//! };
//! let histogram = Histogram::build(&[workload], &[app]).unwrap();
//! assert_eq!(histogram.total(), 2);
//! ```

pub mod diagnostics;
pub mod error;
pub mod histogram;
pub mod model;
pub mod ordered_float;
pub mod status;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{MallooviaError, MallooviaResult};
pub use histogram::{stable_key_hash, Histogram, HistogramKey, WorkloadTuple};
pub use model::{
    AllocationInfo, AllocationUnits, App, AppId, InstanceClass, InstanceClassId, LimitingSet,
    LimitingSetId, PerformanceTable, Problem, ReservedAllocation, System, Workload,
};
pub use ordered_float::OrderedF64;
pub use status::Status;
pub use units::TimeUnit;

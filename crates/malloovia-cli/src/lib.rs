//! # malloovia-cli: command-line interface
//!
//! Reads the YAML problem/solution document format (§6, [`document`]) and
//! drives the `malloovia-phases` controllers over it through two
//! subcommands:
//!
//! ```text
//! malloovia validate [--partial] [--problems-only] [--verbose] <file...>
//! malloovia solve <problems_file> --phase-i-id <id> [--phase-ii-id <id>]
//!                 [-o <out>] [--frac-gap-phase-i <f>] [--frac-gap-phase-ii <f>]
//!                 [--max-seconds <s>] [--threads <n>]
//! ```
//!
//! Structured logging is `tracing` + `tracing-subscriber`, configured from
//! `RUST_LOG` exactly as `gat-solver-common::plugin::run_solver_plugin`
//! sets it up.

pub mod cli;
pub mod commands;
pub mod document;

pub use cli::{Cli, Commands};

//! Command structures and argument parsing, via `clap`'s derive API.
//!
//! Grounded on `gat-cli::cli.rs`'s top-level `Cli`/`Commands` shape; the
//! subcommands and flags themselves follow the source's `cli.py`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "malloovia", version, about = "Two-phase ILP cloud VM allocation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse and structurally validate one or more problem documents.
    Validate {
        /// Keep validating remaining files after one fails to parse.
        #[arg(long)]
        partial: bool,
        /// Only parse the document schema; skip per-problem validation.
        #[arg(long)]
        problems_only: bool,
        /// Print every diagnostic, not just the per-problem summary.
        #[arg(short, long)]
        verbose: bool,
        /// Problem document(s) to validate.
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Solve Phase I (and optionally Phase II) for problems in a document.
    Solve {
        /// Problem document containing the problem(s) to solve.
        problems_file: PathBuf,
        /// Id of the problem to solve in Phase I.
        #[arg(long)]
        phase_i_id: String,
        /// Id of the problem whose workloads drive Phase II, if any.
        #[arg(long)]
        phase_ii_id: Option<String>,
        /// Where to write the combined solutions document (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// CBC's relative MIP gap for Phase I.
        #[arg(long)]
        frac_gap_phase_i: Option<f64>,
        /// CBC's relative MIP gap for Phase II.
        #[arg(long)]
        frac_gap_phase_ii: Option<f64>,
        /// Wall-clock budget per CBC invocation, in seconds.
        #[arg(long)]
        max_seconds: Option<u64>,
        /// Threads CBC may use per invocation.
        #[arg(long)]
        threads: Option<u32>,
    },
}

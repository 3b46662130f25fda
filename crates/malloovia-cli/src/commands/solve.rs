//! `malloovia solve` — runs Phase I, optionally Phase II, and writes a
//! combined solutions document. Grounded on `cli.py`'s `solve` command and
//! `util.py`'s `solutions_to_yaml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use malloovia_core::{Problem, TimeUnit};
use malloovia_phases::{OmniscientStwPredictor, PhaseI, PhaseII, SolutionI, SolutionII};
use malloovia_solver::{CbcSolver, SolveOptions};
use serde::Serialize;
use tracing::info;

use crate::document;

pub struct SolveArgs {
    pub problems_file: PathBuf,
    pub phase_i_id: String,
    pub phase_ii_id: Option<String>,
    pub output: Option<PathBuf>,
    pub frac_gap_phase_i: Option<f64>,
    pub frac_gap_phase_ii: Option<f64>,
    pub max_seconds: Option<u64>,
    pub threads: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SolutionsDocument {
    phase_i: SolutionI,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase_ii: Option<SolutionII>,
}

/// Drives Phase I over `phase_i_id`'s problem and, when `phase_ii_id` is
/// given, Phase II over that problem's own workloads taken as the
/// short-term prediction (an omniscient STWP, §4.9). Returns an error only
/// for I/O failures, per §6's "exits non-zero only on I/O errors".
pub fn run(args: &SolveArgs) -> Result<()> {
    let problems = document::load_problems(&args.problems_file)
        .with_context(|| format!("reading {}", args.problems_file.display()))?;

    let phase_i_problem = get_problem(&problems, &args.phase_i_id)?;

    let timeslot_unit = phase_i_problem
        .workloads
        .first()
        .map(|w| w.time_unit)
        .unwrap_or(TimeUnit::Hour);

    let phase1 = PhaseI::new(CbcSolver, false);
    let phase_i_options = SolveOptions {
        frac_gap: args.frac_gap_phase_i,
        max_seconds: args.max_seconds,
        threads: args.threads,
        keep_files: false,
    };
    info!(problem = %args.phase_i_id, "solving Phase I");
    let solution_i = phase1.solve(phase_i_problem, &phase_i_options, None)?;

    let phase_ii = match &args.phase_ii_id {
        Some(phase_ii_id) => {
            let reserved = solution_i.reserved_allocation().with_context(|| {
                format!(
                    "Phase I on '{}' did not reach an optimal solution; \
                     Phase II needs a reserved allocation",
                    args.phase_i_id
                )
            })?;
            let phase_ii_problem = get_problem(&problems, phase_ii_id)?;
            let system = malloovia_core::System::from_problem(phase_ii_problem);
            let predictor = OmniscientStwPredictor::new(phase_ii_problem);
            let phase_ii_options = SolveOptions {
                frac_gap: args.frac_gap_phase_ii,
                max_seconds: args.max_seconds,
                threads: args.threads,
                keep_files: false,
            };
            let phase2 = PhaseII::new(CbcSolver, false, timeslot_unit, phase_ii_options, true);
            info!(problem = %phase_ii_id, "solving Phase II");
            Some(phase2.solve_period(&system, reserved, &predictor, None)?)
        }
        None => None,
    };

    let document = SolutionsDocument {
        phase_i: solution_i,
        phase_ii,
    };
    write_output(&document, args.output.as_deref())?;
    Ok(())
}

fn get_problem<'a>(
    problems: &'a std::collections::HashMap<String, Problem>,
    id: &str,
) -> Result<&'a Problem> {
    problems
        .get(id)
        .with_context(|| format!("no problem with id '{id}' in the document"))
}

fn write_output(document: &SolutionsDocument, output: Option<&Path>) -> Result<()> {
    let yaml = serde_yaml::to_string(document).context("serializing solutions document")?;
    match output {
        Some(path) => {
            std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

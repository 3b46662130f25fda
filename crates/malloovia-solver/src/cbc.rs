//! CBC adapter: renders an [`LpModel`] to CBC's native LP file format,
//! invokes the `cbc` binary as a subprocess and parses its `.sol`/`.log`
//! output back into a [`SolveResult`].
//!
//! Grounded on `_solve_CBC_patched` in `lpsolver.py`: CBC is driven entirely
//! through files and its command-line interface, never linked in-process —
//! the same approach the original malloovia takes (PuLP's `COIN_CMD`
//! monkey-patched to additionally recover the best bound from CBC's log).
//! This deliberately diverges from the subprocess-vs-FFI choice made
//! elsewhere in this workspace for other solvers; see `DESIGN.md`.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use malloovia_core::Status;
use tempfile::Builder as TempFileBuilder;
use tracing::{debug, warn};

use crate::error::{SolverError, SolverResult};
use crate::lp::{LpModel, Sense, VarKind};

/// Tuning knobs passed through to the CBC command line, mirroring the
/// options `_solve_CBC_patched` accepts (`fracGap`, `maxSeconds`, `threads`).
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    pub frac_gap: Option<f64>,
    pub max_seconds: Option<u64>,
    pub threads: Option<u32>,
    /// Keep the generated `.lp`/`.sol`/`.log` files instead of deleting them
    /// (debugging aid).
    pub keep_files: bool,
}

/// Outcome of a CBC solve: status, objective, the raw variable assignment
/// (for the LP builder to decode into domain types) and, when available,
/// the best known bound (meaningful even when CBC aborted on time).
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: Status,
    pub objective: Option<f64>,
    pub variable_values: HashMap<String, f64>,
    pub best_bound: Option<f64>,
}

/// Locates the `cbc` binary: `$MALLOOVIA_CBC_PATH` first, then `PATH`.
pub fn find_cbc_binary() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MALLOOVIA_CBC_PATH") {
        let candidate = PathBuf::from(path);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    which::which("cbc").ok()
}

pub fn is_cbc_installed() -> bool {
    find_cbc_binary().is_some()
}

/// Solves `model` with CBC, writing scratch files under a fresh temp
/// directory and cleaning them up unless `options.keep_files` is set.
pub fn solve(model: &LpModel, options: &SolveOptions) -> SolverResult<SolveResult> {
    let binary = find_cbc_binary().ok_or(SolverError::NotInstalled)?;

    let dir = TempFileBuilder::new()
        .prefix("malloovia-cbc-")
        .tempdir()
        .map_err(SolverError::Io)?;
    let lp_path = dir.path().join("problem.lp");
    let sol_path = dir.path().join("problem.sol");
    let log_path = dir.path().join("problem.log");

    std::fs::write(&lp_path, render_lp(model)).map_err(SolverError::Io)?;

    let command_line = build_command_line(&binary, &lp_path, &sol_path, options);
    debug!(%command_line, "invoking CBC");

    let start = Instant::now();
    let log_file = std::fs::File::create(&log_path).map_err(SolverError::Io)?;
    let mut child = Command::new(&binary)
        .args(parse_args(&lp_path, &sol_path, options))
        .stdout(log_file.try_clone().map_err(SolverError::Io)?)
        .stderr(log_file)
        .spawn()
        .map_err(SolverError::ProcessStart)?;

    let status = wait_with_timeout(&mut child, options.max_seconds)?;
    let elapsed = start.elapsed();
    debug!(?elapsed, "CBC finished");

    let result = match status {
        None => SolveResult {
            status: Status::Aborted,
            objective: None,
            variable_values: HashMap::new(),
            best_bound: parse_best_bound(&log_path).ok().flatten(),
        },
        Some(exit_status) => {
            if !exit_status.success() {
                warn!(code = ?exit_status.code(), "CBC exited non-zero");
            }
            let (vars, objective, solved_status) = parse_solution(&sol_path).unwrap_or_default();
            let best_bound = parse_best_bound(&log_path).ok().flatten();
            SolveResult {
                status: solved_status.unwrap_or(Status::Unknown),
                objective,
                variable_values: vars,
                best_bound,
            }
        }
    };

    if !options.keep_files {
        let _ = std::fs::remove_file(&lp_path);
        let _ = std::fs::remove_file(&sol_path);
        let _ = std::fs::remove_file(&log_path);
    }

    Ok(result)
}

fn wait_with_timeout(
    child: &mut std::process::Child,
    max_seconds: Option<u64>,
) -> SolverResult<Option<std::process::ExitStatus>> {
    let Some(limit) = max_seconds else {
        return child.wait().map(Some).map_err(SolverError::Io);
    };
    // CBC is asked to respect `sec <limit>` itself; this is a hard backstop
    // in case it doesn't exit promptly.
    let deadline = Duration::from_secs(limit + 30);
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(SolverError::Io)? {
            return Ok(Some(status));
        }
        if start.elapsed() > deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SolverError::Timeout { seconds: limit });
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

/// Builds the CBC CLI argument string, following `_solve_CBC_patched`'s
/// pattern: `<lpfile> [ratio G] [sec S] [threads N] presolve on gomory on
/// knapsack on probing on branch printingOptions all solution <solfile>`.
fn build_command_line(
    binary: &Path,
    lp_path: &Path,
    sol_path: &Path,
    options: &SolveOptions,
) -> String {
    let mut line = format!("{} {}", binary.display(), lp_path.display());
    if let Some(gap) = options.frac_gap {
        let _ = write!(line, " ratio {gap}");
    }
    if let Some(secs) = options.max_seconds {
        let _ = write!(line, " sec {secs}");
    }
    if let Some(threads) = options.threads {
        let _ = write!(line, " threads {threads}");
    }
    line.push_str(" presolve on gomory on knapsack on probing on branch printingOptions all solution ");
    line.push_str(&sol_path.display().to_string());
    line
}

fn parse_args(lp_path: &Path, sol_path: &Path, options: &SolveOptions) -> Vec<String> {
    let mut args = vec![lp_path.display().to_string()];
    if let Some(gap) = options.frac_gap {
        args.push("ratio".into());
        args.push(gap.to_string());
    }
    if let Some(secs) = options.max_seconds {
        args.push("sec".into());
        args.push(secs.to_string());
    }
    if let Some(threads) = options.threads {
        args.push("threads".into());
        args.push(threads.to_string());
    }
    args.extend(
        [
            "presolve", "on", "gomory", "on", "knapsack", "on", "probing", "on", "branch",
            "printingOptions", "all", "solution",
        ]
        .map(str::to_string),
    );
    args.push(sol_path.display().to_string());
    args
}

/// Renders `model` in CPLEX LP format, the dialect CBC's command-line
/// driver reads directly.
pub fn render_lp(model: &LpModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\\ {}", model.name);
    let sense = match model.sense {
        Sense::Minimize => "Minimize",
        Sense::Maximize => "Maximize",
    };
    let _ = writeln!(out, "{sense}");
    out.push_str(" obj: ");
    out.push_str(&render_terms(model.objective.iter().collect::<Vec<_>>().iter().map(|(n, c)| (n.to_string(), *c))));
    out.push('\n');

    out.push_str("Subject To\n");
    for constraint in &model.constraints {
        let terms = render_terms(constraint.terms.iter().map(|(n, c)| (n.clone(), *c)));
        let _ = writeln!(
            out,
            " {}: {} {} {}",
            constraint.name, terms, constraint.relation, constraint.rhs
        );
    }

    let integer_vars: Vec<&str> = model
        .variables
        .iter()
        .filter(|v| v.kind == VarKind::Integer)
        .map(|v| v.name.as_str())
        .collect();
    if !integer_vars.is_empty() {
        out.push_str("General\n");
        for name in integer_vars {
            let _ = writeln!(out, " {name}");
        }
    }
    out.push_str("End\n");
    out
}

fn render_terms(terms: impl Iterator<Item = (String, f64)>) -> String {
    let mut rendered = String::new();
    let mut first = true;
    for (name, coeff) in terms {
        if !first {
            rendered.push(' ');
        }
        first = false;
        if coeff < 0.0 {
            let _ = write!(rendered, "- {} {}", -coeff, name);
        } else {
            let _ = write!(rendered, "+ {coeff} {name}");
        }
    }
    if rendered.is_empty() {
        rendered.push('0');
    }
    rendered
}

/// Parses a CBC `.sol` file: first line carries the objective / status
/// summary (`"Optimal - objective value 178"` or similar), each following
/// line is `<index> <name> <value> <reduced cost>`.
fn parse_solution(
    sol_path: &Path,
) -> SolverResult<(HashMap<String, f64>, Option<f64>, Option<Status>)> {
    let file = std::fs::File::open(sol_path)
        .map_err(|e| SolverError::SolutionFile(format!("{}: {e}", sol_path.display())))?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .ok_or_else(|| SolverError::SolutionFile("empty solution file".into()))?
        .map_err(SolverError::Io)?;
    let (status, objective) = parse_header(&header);

    let mut values = HashMap::new();
    for line in lines {
        let line = line.map_err(SolverError::Io)?;
        let mut fields = line.split_whitespace();
        let _index = fields.next();
        let Some(name) = fields.next() else { continue };
        let Some(value) = fields.next().and_then(|v| v.parse::<f64>().ok()) else {
            continue;
        };
        values.insert(name.to_string(), value);
    }
    Ok((values, objective, Some(status)))
}

fn parse_header(header: &str) -> (Status, Option<f64>) {
    let lower = header.to_ascii_lowercase();
    let status = if lower.starts_with("optimal") {
        Status::Optimal
    } else if lower.contains("integer infeasible") {
        Status::IntegerInfeasible
    } else if lower.contains("infeasible") {
        Status::Infeasible
    } else if lower.contains("stopped on time") || lower.contains("time limit") {
        Status::Aborted
    } else {
        Status::Unknown
    };
    let objective = header
        .rsplit_once("value")
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .and_then(|v| v.parse::<f64>().ok());
    (status, objective)
}

/// Scans the run's `.log` file for the first `"Lower bound:"` line CBC
/// prints, which carries the best bound even when the run was aborted
/// before proving optimality.
fn parse_best_bound(log_path: &Path) -> SolverResult<Option<f64>> {
    let file = match std::fs::File::open(log_path) {
        Ok(f) => f,
        Err(_) => return Ok(None),
    };
    for line in BufReader::new(file).lines() {
        let line = line.map_err(SolverError::Io)?;
        if let Some(rest) = line.trim_start().strip_prefix("Lower bound:") {
            if let Ok(value) = rest.trim().parse::<f64>() {
                return Ok(Some(value));
            }
        }
    }
    Ok(None)
}

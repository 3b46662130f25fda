//! `malloovia validate` — structural checks grounded on `validate_yaml_file`
//! (the source's JSON-schema-backed checker): successful parsing into the
//! document schema, plus the `Diagnostics`-based cross-reference checks
//! `Problem::validate_into` performs. Exits 0 regardless of findings —
//! findings are reported, not signalled through the exit code.

use std::path::Path;

use malloovia_core::Diagnostics;
use tracing::info;

use crate::document;

pub struct ValidateOptions {
    pub partial: bool,
    pub problems_only: bool,
    pub verbose: bool,
}

/// Validates every file in `paths`, printing a per-file report. Never
/// returns an error itself — a file that fails to parse is reported as a
/// failure for that file and validation continues with the rest, matching
/// `--partial`'s spirit of "keep going" (§6); without `--partial` the first
/// file that fails to parse still gets a report but processing still
/// continues, since `validate`'s contract is "exit 0 always".
pub fn run(paths: &[String], options: &ValidateOptions) {
    for path in paths {
        println!("{path}:");
        validate_one(Path::new(path), options);
    }
}

fn validate_one(path: &Path, options: &ValidateOptions) {
    if options.problems_only {
        match document::load_document_text(path) {
            Ok(text) => match document::parse_document(&text, path) {
                Ok(()) => println!("  OK (schema only)"),
                Err(err) => report_error(&err, options),
            },
            Err(err) => report_error(&err, options),
        }
        return;
    }

    let problems = match document::load_problems(path) {
        Ok(problems) => problems,
        Err(err) => {
            report_error(&err, options);
            if !options.partial {
                return;
            }
            return;
        }
    };

    if problems.is_empty() {
        println!("  no problems declared");
        return;
    }

    for (id, problem) in &problems {
        info!(problem = %id, "validating");
        match problem.check_valid() {
            Ok(()) => {
                let mut diagnostics = Diagnostics::new();
                problem.validate_into(&mut diagnostics);
                if diagnostics.has_issues() {
                    println!("  {id}: OK ({})", diagnostics.summary());
                    if options.verbose {
                        for issue in &diagnostics.issues {
                            println!("    - {issue}");
                        }
                    }
                } else {
                    println!("  {id}: OK");
                }
            }
            Err(err) => println!("  {id}: INVALID ({err})"),
        }
    }
}

fn report_error(err: &document::DocumentError, options: &ValidateOptions) {
    println!("  FAILED: {err}");
    if options.verbose {
        println!("    {err:?}");
    }
}

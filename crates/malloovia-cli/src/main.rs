use clap::Parser;
use tracing::error;

use malloovia_cli::cli::{Cli, Commands};
use malloovia_cli::commands::{solve, validate};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Validate {
            partial,
            problems_only,
            verbose,
            files,
        } => {
            let options = validate::ValidateOptions {
                partial: *partial,
                problems_only: *problems_only,
                verbose: *verbose,
            };
            validate::run(files, &options);
        }
        Commands::Solve {
            problems_file,
            phase_i_id,
            phase_ii_id,
            output,
            frac_gap_phase_i,
            frac_gap_phase_ii,
            max_seconds,
            threads,
        } => {
            let args = solve::SolveArgs {
                problems_file: problems_file.clone(),
                phase_i_id: phase_i_id.clone(),
                phase_ii_id: phase_ii_id.clone(),
                output: output.clone(),
                frac_gap_phase_i: *frac_gap_phase_i,
                frac_gap_phase_ii: *frac_gap_phase_ii,
                max_seconds: *max_seconds,
                threads: *threads,
            };
            if let Err(err) = solve::run(&args) {
                error!("solve failed: {err:#}");
                std::process::exit(1);
            }
        }
    }
}

//! Tiergate CLI binary entry point.
//! Resolves configuration, runs the pipeline, and prints results.

use anyhow::Context;
use clap::Parser;
use tiergate::cli::{Cli, Commands};
use tiergate::utils::{error_prefix, note_prefix};
use tiergate::{config, output, pipeline, weakness};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", error_prefix(), e);
            std::process::exit(2);
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over the flags.
fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve(overrides: &config::Overrides) -> config::Effective {
    let eff = config::resolve_effective(overrides);
    if !eff.config_found {
        eprintln!("{} No tiergate.toml found; using defaults.", note_prefix());
    }
    eff
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
        Commands::Analyze {
            paths,
            out,
            checklist,
            check,
        } => {
            let eff = resolve(&paths.overrides(out, checklist));
            let outcome = pipeline::run_and_emit(&eff.pipeline)
                .context("analysis aborted")?;
            output::print_analysis(
                &outcome.analysis,
                &eff.output,
                Some(eff.pipeline.analysis_out.as_path()),
                Some(eff.pipeline.checklist_out.as_path()),
            );
            if check && !outcome.analysis.review_checklist.is_empty() {
                return Ok(1);
            }
            Ok(0)
        }
        Commands::Rank {
            paths,
            tier,
            exclude_above,
            limit,
        } => {
            let eff = resolve(&paths.overrides(None, None));
            let outcome = pipeline::run(&eff.pipeline).context("ranking aborted")?;
            let mut ranked = weakness::rank(&outcome.analysis, tier);
            if let Some(threshold) = exclude_above {
                ranked = weakness::exclusion_candidates(&ranked, threshold);
            }
            if let Some(n) = limit {
                ranked.truncate(n);
            }
            output::print_rank(&ranked, &eff.output, exclude_above);
            Ok(0)
        }
    }
}

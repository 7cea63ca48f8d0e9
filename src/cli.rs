//! CLI argument parsing via `clap`.

use crate::config::Overrides;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tiergate",
    version,
    about = "Tier classification and quality scoring for validated component datasets",
    long_about = "Tiergate reads a validation report, re-checks each dataset folder, classifies it by confidence, scores its weakness, and writes an analysis plus a review checklist.\n\nConfiguration precedence: CLI > tiergate.toml > defaults.",
    after_help = "Examples:\n  tiergate analyze --report validation-report.json --datasets datasets\n  tiergate analyze --check --output json\n  tiergate rank --tier 2 --exclude-above 2.5",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, short, global = true, action = clap::ArgAction::SetTrue, help = "Enable debug logging")]
    pub verbose: bool,
    #[arg(long, short, global = true, action = clap::ArgAction::SetTrue, conflicts_with = "verbose", help = "Only log errors")]
    pub quiet: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Clone, Default)]
/// Path and output options shared by analyze and rank.
pub struct PathArgs {
    #[arg(long, help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, help = "Path to the validation report JSON")]
    pub report: Option<String>,
    #[arg(long, help = "Directory holding one folder per dataset")]
    pub datasets: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
}

impl PathArgs {
    pub fn overrides(&self, analysis: Option<String>, checklist: Option<String>) -> Overrides {
        Overrides {
            repo_root: self.repo_root.clone(),
            report: self.report.clone(),
            datasets: self.datasets.clone(),
            analysis,
            checklist,
            output: self.output.clone(),
        }
    }
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current tiergate version.")]
    Version,
    /// Classify folders and write analysis artifacts
    #[command(
        about = "Classify folders and write artifacts",
        long_about = "Evaluate every folder in the report, then write the analysis JSON and the review checklist. Both artifacts are replaced on every run.",
        after_help = "Examples:\n  tiergate analyze\n  tiergate analyze --out analysis/tiers.json --checklist analysis/review.md --check"
    )]
    Analyze {
        #[command(flatten)]
        paths: PathArgs,
        #[arg(long, help = "Path for the analysis JSON")]
        out: Option<String>,
        #[arg(long, help = "Path for the review checklist markdown")]
        checklist: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero if any folder needs manual review")]
        check: bool,
    },
    /// Rank folders by weakness score
    #[command(
        about = "Rank folders by weakness",
        long_about = "Evaluate folders in memory and list them weakest first. No artifacts are written.",
        after_help = "Examples:\n  tiergate rank --tier 1\n  tiergate rank --exclude-above 2 --output json"
    )]
    Rank {
        #[command(flatten)]
        paths: PathArgs,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3), help = "Only rank folders of this tier")]
        tier: Option<u8>,
        #[arg(long, help = "Only list folders scoring strictly above this threshold")]
        exclude_above: Option<f64>,
        #[arg(long, help = "Maximum number of folders to list")]
        limit: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_flags() {
        let cli = Cli::try_parse_from([
            "tiergate", "analyze", "--report", "r.json", "--out", "a.json", "--check", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.cmd {
            Commands::Analyze {
                paths, out, check, ..
            } => {
                assert_eq!(paths.report.as_deref(), Some("r.json"));
                assert_eq!(out.as_deref(), Some("a.json"));
                assert!(check);
                let ov = paths.overrides(out, None);
                assert_eq!(ov.analysis.as_deref(), Some("a.json"));
                assert!(ov.checklist.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_rank_rejects_unknown_tier() {
        assert!(Cli::try_parse_from(["tiergate", "rank", "--tier", "4"]).is_err());
        let cli = Cli::try_parse_from(["tiergate", "rank", "--tier", "3", "--limit", "5"]).unwrap();
        match cli.cmd {
            Commands::Rank { tier, limit, .. } => {
                assert_eq!(tier, Some(3));
                assert_eq!(limit, Some(5));
            }
            _ => panic!("expected rank"),
        }
    }
}

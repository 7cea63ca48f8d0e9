//! Configuration discovery and effective settings resolution.
//!
//! Tiergate reads `tiergate.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an
//! `Effective` config. Defaults:
//! - `report`: `validation-report.json`
//! - `datasets`: `datasets`
//! - `analysis`: `analysis/tier-analysis.json`
//! - `checklist`: `analysis/review-checklist.md`
//! - `output`: `human`
//! - `[scoring]`: see `ScoringConfig::default`
//!
//! Relative paths resolve against the repository root.
//! Overrides precedence: CLI > config file > defaults.

use crate::pipeline::PipelineConfig;
use crate::weakness::ScoringConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT: &str = "validation-report.json";
pub const DEFAULT_DATASETS: &str = "datasets";
pub const DEFAULT_ANALYSIS: &str = "analysis/tier-analysis.json";
pub const DEFAULT_CHECKLIST: &str = "analysis/review-checklist.md";

const CONFIG_NAMES: [&str; 3] = ["tiergate.toml", "tiergate.yaml", "tiergate.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `tiergate.toml|yaml`.
pub struct TiergateConfig {
    pub report: Option<String>,
    pub datasets: Option<String>,
    pub analysis: Option<String>,
    pub checklist: Option<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

#[derive(Debug, Default, Clone)]
/// Values given on the command line; `None` defers to config or defaults.
pub struct Overrides {
    pub repo_root: Option<String>,
    pub report: Option<String>,
    pub datasets: Option<String>,
    pub analysis: Option<String>,
    pub checklist: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_found: bool,
    pub output: String,
    pub pipeline: PipelineConfig,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `tiergate.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `TiergateConfig` from `tiergate.toml` or `tiergate.yaml|yml` if present.
///
/// A config file that fails to parse is reported and ignored.
pub fn load_config(root: &Path) -> Option<TiergateConfig> {
    let toml_path = root.join("tiergate.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        return match toml::from_str::<TiergateConfig>(&s) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(path = %toml_path.display(), error = %e, "ignoring invalid config");
                None
            }
        };
    }
    for yml in ["tiergate.yaml", "tiergate.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            return match serde_yaml::from_str::<TiergateConfig>(&s) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "ignoring invalid config");
                    None
                }
            };
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &Overrides) -> Effective {
    let start = PathBuf::from(cli.repo_root.as_deref().unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root);
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let pick = |cli_val: &Option<String>, cfg_val: Option<String>, default: &str| -> PathBuf {
        let raw = cli_val
            .clone()
            .or(cfg_val)
            .unwrap_or_else(|| default.to_string());
        repo_root.join(raw)
    };

    let pipeline = PipelineConfig {
        report: pick(&cli.report, cfg.report, DEFAULT_REPORT),
        datasets_root: pick(&cli.datasets, cfg.datasets, DEFAULT_DATASETS),
        analysis_out: pick(&cli.analysis, cfg.analysis, DEFAULT_ANALYSIS),
        checklist_out: pick(&cli.checklist, cfg.checklist, DEFAULT_CHECKLIST),
        scoring: cfg.scoring.unwrap_or_default().sanitized(),
    };

    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    Effective {
        repo_root,
        config_found,
        output,
        pipeline,
    }
}

//! Pipeline entry point: report in, analysis and checklist out.
//!
//! Folders are evaluated independently; rayon fans them out per tier and
//! `collect` keeps input order, so every output list is stable.

use crate::checklist;
use crate::emit;
use crate::error::PipelineError;
use crate::evaluate::{self, EvalContext, Evaluation};
use crate::models::analysis::{AnalysisOutput, FolderFiles};
use crate::models::{FolderReport, ValidationReport};
use crate::weakness::ScoringConfig;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
/// Every path a run touches, plus scoring knobs.
pub struct PipelineConfig {
    pub report: PathBuf,
    pub datasets_root: PathBuf,
    pub analysis_out: PathBuf,
    pub checklist_out: PathBuf,
    pub scoring: ScoringConfig,
}

/// Result of one run held in memory.
pub struct Outcome {
    pub analysis: AnalysisOutput,
    pub checklist: String,
}

/// Read and parse the input report. Both failures are fatal.
pub fn load_report(path: &Path) -> Result<ValidationReport, PipelineError> {
    let data = fs::read_to_string(path).map_err(|source| PipelineError::ReportRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| PipelineError::ReportParse {
        path: path.to_path_buf(),
        source,
    })
}

fn evaluate_all<V: Send>(
    folders: &[FolderReport],
    ctx: &EvalContext<'_>,
    eval: fn(&EvalContext<'_>, &FolderReport) -> Evaluation<V>,
) -> Vec<Evaluation<V>> {
    folders.par_iter().map(|f| eval(ctx, f)).collect()
}

/// Evaluate every folder of `report` against the datasets on disk.
pub fn analyze(
    report: &ValidationReport,
    datasets_root: &Path,
    scoring: &ScoringConfig,
    generated_at: DateTime<Utc>,
) -> AnalysisOutput {
    let ctx = EvalContext {
        datasets_root,
        scoring,
    };
    tracing::info!(
        tier1 = report.tier1.len(),
        tier2 = report.tier2.len(),
        tier3 = report.tier3.len(),
        "evaluating folders"
    );
    let mut out = AnalysisOutput::new(generated_at);

    for ev in evaluate_all(&report.tier1, &ctx, evaluate::evaluate_tier1) {
        tracing::debug!(folder = %ev.verdict.folder_name, ready = ev.verdict.ready, "tier 1 verdict");
        record_files(&mut out, &ev.verdict.folder_name, ev.files);
        out.tier1.push(ev.verdict);
    }
    for ev in evaluate_all(&report.tier2, &ctx, evaluate::evaluate_tier2) {
        tracing::debug!(folder = %ev.verdict.folder_name, ready = ev.verdict.ready, "tier 2 verdict");
        record_files(&mut out, &ev.verdict.folder_name, ev.files);
        out.review_checklist.extend(ev.checklist);
        out.tier2.push(ev.verdict);
    }
    for ev in evaluate_all(&report.tier3, &ctx, evaluate::evaluate_tier3) {
        tracing::debug!(folder = %ev.verdict.folder_name, fixable = ev.verdict.fixable, "tier 3 verdict");
        record_files(&mut out, &ev.verdict.folder_name, ev.files);
        out.review_checklist.extend(ev.checklist);
        out.tier3.push(ev.verdict);
    }
    out
}

fn record_files(out: &mut AnalysisOutput, folder_name: &str, files: FolderFiles) {
    if out.file_checks.insert(folder_name.to_string(), files).is_some() {
        tracing::warn!(folder = folder_name, "folder listed in more than one tier");
    }
}

/// Load the report and analyze it without writing anything.
pub fn run(cfg: &PipelineConfig) -> Result<Outcome, PipelineError> {
    tracing::info!(
        report = %cfg.report.display(),
        datasets = %cfg.datasets_root.display(),
        "starting analysis"
    );
    let report = load_report(&cfg.report)?;
    let analysis = analyze(&report, &cfg.datasets_root, &cfg.scoring, Utc::now());
    let checklist = checklist::render(&analysis.review_checklist, analysis.generated_at);
    Ok(Outcome {
        analysis,
        checklist,
    })
}

/// `run`, then persist both artifacts.
pub fn run_and_emit(cfg: &PipelineConfig) -> Result<Outcome, PipelineError> {
    let outcome = run(cfg)?;
    emit::write_artifacts(
        &outcome.analysis,
        &outcome.checklist,
        &cfg.analysis_out,
        &cfg.checklist_out,
    )?;
    Ok(outcome)
}

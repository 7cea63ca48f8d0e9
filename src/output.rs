//! Output rendering for the analyze and rank commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form is a
//! stable summary object; the full analysis lives in the written artifact.

use crate::models::analysis::AnalysisOutput;
use crate::utils::{display_path, use_colors};
use crate::weakness::RankedFolder;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

/// Compose the analyze summary object (pure) for testing/snapshot purposes.
pub fn compose_analysis_json(
    a: &AnalysisOutput,
    analysis_path: Option<&Path>,
    checklist_path: Option<&Path>,
) -> JsonVal {
    let tier = |total: usize, ready: usize| json!({ "total": total, "ready": ready });
    json!({
        "generatedAt": a.generated_at.to_rfc3339(),
        "tier1": tier(a.tier1.len(), a.tier1.iter().filter(|v| v.ready).count()),
        "tier2": tier(a.tier2.len(), a.tier2.iter().filter(|v| v.ready).count()),
        "tier3": tier(a.tier3.len(), a.tier3.iter().filter(|v| v.fixable).count()),
        "ready": a.ready_count(),
        "needsReview": a.review_checklist.len(),
        "artifacts": {
            "analysis": analysis_path.map(display_path),
            "checklist": checklist_path.map(display_path),
        }
    })
}

/// Print the analyze summary.
pub fn print_analysis(
    a: &AnalysisOutput,
    output: &str,
    analysis_path: Option<&Path>,
    checklist_path: Option<&Path>,
) {
    if output == "json" {
        let out = compose_analysis_json(a, analysis_path, checklist_path);
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return;
    }
    let color = use_colors(output);
    let line = |label: &str, total: usize, extra: String| {
        if color {
            println!("{} {} {}", label.bold(), total, extra.bright_black());
        } else {
            println!("{} {} {}", label, total, extra);
        }
    };
    line(
        "tier 1:",
        a.tier1.len(),
        format!("({} ready)", a.tier1.iter().filter(|v| v.ready).count()),
    );
    line(
        "tier 2:",
        a.tier2.len(),
        format!("({} ready)", a.tier2.iter().filter(|v| v.ready).count()),
    );
    line(
        "tier 3:",
        a.tier3.len(),
        format!("({} fixable)", a.tier3.iter().filter(|v| v.fixable).count()),
    );
    let review = a.review_checklist.len();
    let summary = if review == 0 {
        "— Summary — no manual review required".to_string()
    } else {
        format!("— Summary — {} folder(s) need manual review", review)
    };
    if color {
        if review == 0 {
            println!("{}", summary.green().bold());
        } else {
            println!("{}", summary.yellow().bold());
        }
    } else {
        println!("{}", summary);
    }
    for (label, path) in [("analysis", analysis_path), ("checklist", checklist_path)] {
        if let Some(p) = path {
            println!("📄 {}: {}", label, display_path(p));
        }
    }
}

/// Compose rank JSON object (pure) for testing/snapshot purposes.
pub fn compose_rank_json(ranked: &[RankedFolder], threshold: Option<f64>) -> JsonVal {
    json!({
        "threshold": threshold,
        "folders": ranked,
        "total": ranked.len(),
    })
}

/// Print folders weakest first.
pub fn print_rank(ranked: &[RankedFolder], output: &str, threshold: Option<f64>) {
    if output == "json" {
        let out = compose_rank_json(ranked, threshold);
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return;
    }
    let color = use_colors(output);
    for (i, r) in ranked.iter().enumerate() {
        let status = if r.ready { "ready" } else { "not ready" };
        let score = format!("{:>6.2}", r.score);
        if color {
            let score = if r.score > 0.0 {
                score.red().to_string()
            } else {
                score.green().to_string()
            };
            println!(
                "{:>4}. {} {} (tier {}, {})",
                i + 1,
                score,
                r.folder_name.bold(),
                r.tier,
                status
            );
        } else {
            println!(
                "{:>4}. {} {} (tier {}, {})",
                i + 1,
                score,
                r.folder_name,
                r.tier,
                status
            );
        }
    }
    if ranked.is_empty() {
        println!("no folders matched");
    }
}

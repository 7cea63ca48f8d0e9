//! Advisory weakness scoring for ranking folders within a tier.
//!
//! The score is a weighted sum of completeness signals; higher means
//! weaker. It never affects `ready`.

use crate::models::analysis::{AnalysisOutput, FolderFiles};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
/// Weights and thresholds, configurable under `[scoring]`.
pub struct ScoringConfig {
    pub missing_file_weight: f64,
    pub low_component_weight: f64,
    pub low_message_weight: f64,
    pub no_grading_guidance_weight: f64,
    pub low_props_weight: f64,
    pub safe_mismatch_weight: f64,
    pub min_components: usize,
    pub min_messages: usize,
    pub min_props_per_component: f64,
}

impl ScoringConfig {
    /// Clamp negative or NaN weights to zero so scores stay non-negative.
    pub fn sanitized(mut self) -> Self {
        for (name, weight) in [
            ("missing_file_weight", &mut self.missing_file_weight),
            ("low_component_weight", &mut self.low_component_weight),
            ("low_message_weight", &mut self.low_message_weight),
            ("no_grading_guidance_weight", &mut self.no_grading_guidance_weight),
            ("low_props_weight", &mut self.low_props_weight),
            ("safe_mismatch_weight", &mut self.safe_mismatch_weight),
        ] {
            if weight.is_nan() || *weight < 0.0 {
                tracing::warn!(key = name, value = *weight, "invalid scoring weight clamped to 0");
                *weight = 0.0;
            }
        }
        self
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            missing_file_weight: 2.0,
            low_component_weight: 1.0,
            low_message_weight: 0.5,
            no_grading_guidance_weight: 0.5,
            low_props_weight: 0.5,
            safe_mismatch_weight: 0.3,
            min_components: 2,
            min_messages: 4,
            min_props_per_component: 3.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Raw measurements taken from a folder's artifacts.
pub struct FolderSignals {
    pub safe_mismatches: u32,
    pub missing_files: u8,
    pub component_count: usize,
    pub average_props: f64,
    pub message_count: usize,
    pub messages_without_guidance: usize,
    pub component_usages: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaknessFlags {
    pub few_components: bool,
    pub few_messages: bool,
    pub missing_grading_guidance: bool,
    pub thin_props: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weakness {
    pub score: f64,
    pub flags: WeaknessFlags,
    pub signals: FolderSignals,
}

fn flag(on: bool, weight: f64) -> f64 {
    if on {
        weight
    } else {
        0.0
    }
}

/// Score a folder's signals.
pub fn score(signals: FolderSignals, cfg: &ScoringConfig) -> Weakness {
    let flags = WeaknessFlags {
        few_components: signals.component_count < cfg.min_components,
        few_messages: signals.message_count < cfg.min_messages,
        missing_grading_guidance: signals.messages_without_guidance > 0,
        // No interfaces means no average to judge.
        thin_props: signals.component_count > 0
            && signals.average_props < cfg.min_props_per_component,
    };
    let missing = f64::from(signals.missing_files.min(3));
    let score = missing * cfg.missing_file_weight
        + flag(flags.few_components, cfg.low_component_weight)
        + flag(flags.few_messages, cfg.low_message_weight)
        + flag(flags.missing_grading_guidance, cfg.no_grading_guidance_weight)
        + flag(flags.thin_props, cfg.low_props_weight)
        + f64::from(signals.safe_mismatches) * cfg.safe_mismatch_weight;
    Weakness {
        score,
        flags,
        signals,
    }
}

/// Collect signals from the folder's files. Unreadable artifacts count as empty.
pub fn gather(
    folder_dir: &Path,
    files: &FolderFiles,
    conversation: Option<&Json>,
    safe_mismatches: u32,
) -> FolderSignals {
    let interfaces = if files.components_ts.exists {
        fs::read_to_string(folder_dir.join(crate::files::COMPONENTS_TS))
            .map(|src| interface_field_counts(&src))
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    let component_count = interfaces.len();
    let average_props = if component_count == 0 {
        0.0
    } else {
        interfaces.iter().sum::<usize>() as f64 / component_count as f64
    };

    let messages: &[Json] = conversation
        .and_then(|c| c.get("conversation"))
        .and_then(Json::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let messages_without_guidance = messages
        .iter()
        .filter(|m| m.get("grading_guidance").map_or(true, Json::is_null))
        .count();
    let component_usages = messages
        .iter()
        .filter_map(|m| m.get("content").and_then(Json::as_array))
        .flatten()
        .filter(|c| c.get("type").and_then(Json::as_str) == Some("component"))
        .count();

    FolderSignals {
        safe_mismatches,
        missing_files: files.missing().len() as u8,
        component_count,
        average_props,
        message_count: messages.len(),
        messages_without_guidance,
        component_usages,
    }
}

fn interface_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"export\s+interface\s+[A-Za-z_$][\w$]*(?:\s*<[^{]*>)?(?:\s+extends\s+[^{]+)?\s*\{")
            .expect("valid interface regex")
    })
}

fn member_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*(?:readonly\s+)?(?:[A-Za-z_$][\w$]*|"[^"]*"|'[^']*')\s*\??\s*[:(]"#)
            .expect("valid member regex")
    })
}

/// Number of top-level members of each `export interface` in a TS source.
pub fn interface_field_counts(src: &str) -> Vec<usize> {
    interface_re()
        .find_iter(src)
        .map(|m| count_members(&src[m.end()..]))
        .collect()
}

/// Count members in an interface body starting just after its `{`.
fn count_members(body: &str) -> usize {
    let mut depth = 0usize;
    let mut count = 0usize;
    let mut segment = String::new();
    let mut prev = '\0';
    fn flush(segment: &mut String, count: &mut usize) {
        if member_re().is_match(segment) {
            *count += 1;
        }
        segment.clear();
    }
    for ch in body.chars() {
        match ch {
            '{' | '(' | '[' | '<' => depth += 1,
            '}' if depth == 0 => break,
            // `=>` of a function type closes nothing
            '>' if prev == '=' => {}
            '}' | ')' | ']' | '>' => depth = depth.saturating_sub(1),
            ';' | ',' | '\n' if depth == 0 => {
                flush(&mut segment, &mut count);
                prev = ch;
                continue;
            }
            _ => {}
        }
        segment.push(ch);
        prev = ch;
    }
    flush(&mut segment, &mut count);
    count
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedFolder {
    pub folder_name: String,
    pub tier: u8,
    pub ready: bool,
    pub score: f64,
}

/// Folders ordered weakest first; ties keep tier then input order.
pub fn rank(output: &AnalysisOutput, tier: Option<u8>) -> Vec<RankedFolder> {
    let entry = |t: u8, name: &str, ready: bool, w: &Weakness| RankedFolder {
        folder_name: name.to_string(),
        tier: t,
        ready,
        score: w.score,
    };
    let mut all: Vec<RankedFolder> = Vec::new();
    all.extend(output.tier1.iter().map(|v| entry(1, &v.folder_name, v.ready, &v.weakness)));
    all.extend(output.tier2.iter().map(|v| entry(2, &v.folder_name, v.ready, &v.weakness)));
    all.extend(output.tier3.iter().map(|v| entry(3, &v.folder_name, v.ready, &v.weakness)));
    all.retain(|r| tier.map_or(true, |t| r.tier == t));
    // sort_by is stable, so equal scores keep their input order
    all.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    all
}

/// Folders whose score is strictly above `threshold`.
pub fn exclusion_candidates(ranked: &[RankedFolder], threshold: f64) -> Vec<RankedFolder> {
    ranked
        .iter()
        .filter(|r| r.score > threshold)
        .cloned()
        .collect()
}

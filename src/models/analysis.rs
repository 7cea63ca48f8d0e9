//! Output models: per-tier verdicts, file checks, and the aggregate analysis.

use super::CheckResult;
use crate::weakness::Weakness;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Ordinal confidence scale shared by all tiers, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl Confidence {
    /// Numeric form for sorting and JSON consumers.
    pub fn score(self) -> f64 {
        match self {
            Confidence::VeryHigh => 1.0,
            Confidence::High => 0.8,
            Confidence::Medium => 0.6,
            Confidence::Low => 0.4,
            Confidence::VeryLow => 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Presence of one required file. Recomputed on every run.
pub struct FileCheckResult {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FileCheckResult {
    pub fn present(size: u64) -> Self {
        Self {
            exists: true,
            size: Some(size),
            reason: None,
        }
    }

    pub fn absent(reason: impl Into<String>) -> Self {
        Self {
            exists: false,
            size: None,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// The three required files of a folder.
pub struct FolderFiles {
    pub components_ts: FileCheckResult,
    pub canvas_html: FileCheckResult,
    pub conversation_json: FileCheckResult,
}

impl FolderFiles {
    fn entries(&self) -> [(&'static str, &FileCheckResult); 3] {
        [
            (crate::files::COMPONENTS_TS, &self.components_ts),
            (crate::files::CANVAS_HTML, &self.canvas_html),
            (crate::files::CONVERSATION_JSON, &self.conversation_json),
        ]
    }

    pub fn all_present(&self) -> bool {
        self.entries().iter().all(|(_, f)| f.exists)
    }

    /// Names of the required files that are absent or empty.
    pub fn missing(&self) -> Vec<&'static str> {
        self.entries()
            .iter()
            .filter(|(_, f)| !f.exists)
            .map(|(name, _)| *name)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier1Verdict {
    pub folder_name: String,
    pub confidence: Confidence,
    pub ready: bool,
    pub notes: String,
    pub files_present: bool,
    pub weakness: Weakness,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Flexibility of the schema matched to one mismatched component.
pub struct SchemaCheck {
    pub component: String,
    pub flexible: bool,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier2Verdict {
    pub folder_name: String,
    pub confidence: Confidence,
    pub ready: bool,
    pub notes: String,
    pub has_only_safe_issues: bool,
    pub safe_to_filter: bool,
    pub safe_mismatches: u32,
    pub files_present: bool,
    pub schema_checks: Vec<SchemaCheck>,
    /// `None` when the conversation record loaded cleanly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_error: Option<String>,
    pub weakness: Weakness,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Issue categories detected among a tier-3 folder's critical issues.
pub struct Tier3Issues {
    pub missing_export_interface: bool,
    pub generic_node_attribute: bool,
    pub props_mismatch: bool,
    pub schema_mismatch: bool,
    /// Critical check names outside the known categories.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unrecognized: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier3Verdict {
    pub folder_name: String,
    pub confidence: Confidence,
    pub ready: bool,
    pub notes: String,
    pub issues: Tier3Issues,
    pub fixable: bool,
    pub disqualifying: bool,
    pub files_present: bool,
    pub weakness: Weakness,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
/// Raw issue attached to a checklist entry.
pub enum IssueItem {
    Text(String),
    Check(CheckResult),
}

impl IssueItem {
    pub fn render(&self) -> String {
        match self {
            IssueItem::Text(s) => s.clone(),
            IssueItem::Check(c) => c.summary_line(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// A folder whose verdict still needs a human decision.
pub struct ChecklistEntry {
    pub folder_name: String,
    pub tier: u8,
    pub questions: Vec<String>,
    pub issues: Vec<IssueItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// Aggregate result of one pipeline run; replaces any previous output.
pub struct AnalysisOutput {
    pub generated_at: DateTime<Utc>,
    pub tier1: Vec<Tier1Verdict>,
    pub tier2: Vec<Tier2Verdict>,
    pub tier3: Vec<Tier3Verdict>,
    pub file_checks: BTreeMap<String, FolderFiles>,
    pub review_checklist: Vec<ChecklistEntry>,
}

impl AnalysisOutput {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            tier1: Vec::new(),
            tier2: Vec::new(),
            tier3: Vec::new(),
            file_checks: BTreeMap::new(),
            review_checklist: Vec::new(),
        }
    }

    pub fn ready_count(&self) -> usize {
        self.tier1.iter().filter(|v| v.ready).count()
            + self.tier2.iter().filter(|v| v.ready).count()
            + self.tier3.iter().filter(|v| v.ready).count()
    }
}

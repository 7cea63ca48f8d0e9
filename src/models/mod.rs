//! Input models for the upstream validation report.
//!
//! Optional fields default to empty collections or `None` at
//! deserialization time, so evaluators never have to probe for presence.

pub mod analysis;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

#[derive(Debug, Clone, Default, Deserialize)]
/// Top-level report: folders pre-sorted into three tiers upstream.
pub struct ValidationReport {
    #[serde(default)]
    pub tier1: Vec<FolderReport>,
    #[serde(default)]
    pub tier2: Vec<FolderReport>,
    #[serde(default)]
    pub tier3: Vec<FolderReport>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One folder's validation outcome.
pub struct FolderReport {
    /// Directory name under the datasets root; the join key for every artifact.
    pub folder_name: String,
    #[serde(default)]
    pub report: CheckReport,
    /// Issues left after upstream filtering. Absent means none.
    #[serde(default)]
    pub filtered_issues: Vec<String>,
    /// Failed checks that placed the folder in tier 3. Absent means none.
    #[serde(default)]
    pub critical_issues: Vec<CheckResult>,
    /// Hard error raised by the validator for this folder, if any.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckReport {
    #[serde(default)]
    pub results: Vec<CheckResult>,
}

impl CheckReport {
    /// First result with the given check name.
    pub fn find(&self, check: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.check == check)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
/// Outcome of one named validation rule.
pub struct CheckResult {
    pub check: String,
    pub passed: bool,
    /// Per-violation text, usually `"Component.field: message"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CheckMetadata>,
}

impl CheckResult {
    /// Safe mismatch count reported by the validator; zero when not reported.
    pub fn safe_mismatches(&self) -> u32 {
        self.metadata
            .as_ref()
            .and_then(|m| m.total_safe_mismatches)
            .unwrap_or(0)
    }

    /// Single-line rendering used in checklists: `"<check>: <message>"`.
    pub fn summary_line(&self) -> String {
        let message = if self.details.is_empty() {
            "check failed".to_string()
        } else {
            self.details.join("; ")
        };
        format!("{}: {}", self.check, message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_safe_mismatches: Option<u32>,
    /// Validator-specific keys carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

//! Per-tier evaluators turning a `FolderReport` into a verdict.
//!
//! Each evaluator re-checks the folder's required files, scores its
//! weakness, and decides confidence and readiness:
//! - tier 1: very-high confidence, ready only when every file is present;
//! - tier 2: high when all filtered issues are safe and files are present,
//!   medium otherwise; unsafe issues go to the review checklist;
//! - tier 3: never ready; low when the critical issues are superficial,
//!   very-low otherwise; always reviewed.

use crate::files;
use crate::issues;
use crate::models::analysis::{
    ChecklistEntry, Confidence, FolderFiles, IssueItem, SchemaCheck, Tier1Verdict, Tier2Verdict,
    Tier3Issues, Tier3Verdict,
};
use crate::models::FolderReport;
use crate::schema::{SchemaIndex, NO_SCHEMA};
use crate::weakness::{self, ScoringConfig, Weakness};
use serde_json::Value as Json;
use std::path::Path;

/// Check whose failure details name the mismatched components.
pub const INTERFACE_MATCHES_SCHEMA: &str = "Interface matches schema";
/// Tier-3 check names, one per issue category.
pub const EXPORTS_INTERFACE: &str = "Exports props interface";
pub const NO_GENERIC_NODE_ATTRIBUTES: &str = "No generic node attributes";
pub const PROPS_MATCH_SCHEMA: &str = "Props match schema";

pub const REQUIRED_FILES_QUESTION: &str =
    "Are all required files present (components.ts, canvas.html, conversation.json)?";
pub const TIER2_QUESTIONS: [&str; 3] = [
    "Are the mismatches only for optional or collection fields?",
    "Does the component schema permit additional properties?",
    REQUIRED_FILES_QUESTION,
];
pub const EXPORT_INTERFACE_QUESTION: &str =
    "Can the missing exported props interface be added without changing the component contract?";
pub const GENERIC_NODE_QUESTION: &str =
    "Can the disallowed generic node attributes be removed without losing meaning?";
pub const PROPS_MISMATCH_QUESTION: &str =
    "Do the props used in the conversation diverge from the schema in a way that changes behavior?";
pub const SCHEMA_MISMATCH_QUESTION: &str =
    "Is the interface/schema divergence limited to optional or collection fields?";
pub const GRADING_GUIDANCE_QUESTION: &str =
    "Can the messages without grading guidance be annotated before the folder is used?";

/// Shared inputs for evaluating folders of one run.
pub struct EvalContext<'a> {
    pub datasets_root: &'a Path,
    pub scoring: &'a ScoringConfig,
}

/// Verdict plus the side outputs the pipeline aggregates.
pub struct Evaluation<V> {
    pub verdict: V,
    pub files: FolderFiles,
    pub checklist: Option<ChecklistEntry>,
}

/// File checks, conversation record, and weakness for one folder.
struct FolderState {
    files: FolderFiles,
    conversation: Result<Json, String>,
    safe_mismatches: u32,
    weakness: Weakness,
}

impl FolderState {
    fn collect(ctx: &EvalContext<'_>, folder: &FolderReport) -> Self {
        let safe_mismatches = folder
            .report
            .find(INTERFACE_MATCHES_SCHEMA)
            .map_or(0, |r| r.safe_mismatches());
        let files = files::check_folder(ctx.datasets_root, &folder.folder_name);
        let conversation = files::load_conversation(ctx.datasets_root, &folder.folder_name)
            .map_err(|e| {
                tracing::warn!(folder = %folder.folder_name, error = %e, "degraded conversation record");
                e.to_string()
            });
        let signals = weakness::gather(
            &ctx.datasets_root.join(&folder.folder_name),
            &files,
            conversation.as_ref().ok(),
            safe_mismatches,
        );
        let weakness = weakness::score(signals, ctx.scoring);
        Self {
            files,
            conversation,
            safe_mismatches,
            weakness,
        }
    }

    fn conversation_error(&self) -> Option<&str> {
        self.conversation.as_ref().err().map(String::as_str)
    }
}

fn missing_note(files: &FolderFiles) -> Option<String> {
    let missing = files.missing();
    if missing.is_empty() {
        None
    } else {
        Some(format!("files missing: {}", missing.join(", ")))
    }
}

pub fn evaluate_tier1(ctx: &EvalContext<'_>, folder: &FolderReport) -> Evaluation<Tier1Verdict> {
    let state = FolderState::collect(ctx, folder);
    let ready = state.files.all_present();
    let mut notes = match missing_note(&state.files) {
        None => "All checks passed, files present".to_string(),
        Some(m) => format!("All checks passed, but {}", m),
    };
    if let Some(e) = state.conversation_error() {
        notes.push_str("; ");
        notes.push_str(e);
    }
    Evaluation {
        verdict: Tier1Verdict {
            folder_name: folder.folder_name.clone(),
            confidence: Confidence::VeryHigh,
            ready,
            notes,
            files_present: ready,
            weakness: state.weakness,
        },
        files: state.files,
        checklist: None,
    }
}

/// Component prefix of a `"Component.field: message"` or `"Component: message"` detail.
fn component_prefix(detail: &str) -> Option<&str> {
    let head = match detail.split_once(':') {
        // The subject is the last word before the colon.
        Some((before, _)) => before.split_whitespace().last()?,
        None => detail.split_once('.')?.0.trim(),
    };
    let name = head.split('.').next().unwrap_or(head);
    if name.is_empty() || name.contains(char::is_whitespace) {
        None
    } else {
        Some(name)
    }
}

/// Distinct component names from mismatch details, in first-seen order.
pub fn component_names(details: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for detail in details {
        let Some(name) = component_prefix(detail) else {
            tracing::debug!(detail = %detail, "no component name in mismatch detail");
            continue;
        };
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

pub fn evaluate_tier2(ctx: &EvalContext<'_>, folder: &FolderReport) -> Evaluation<Tier2Verdict> {
    let interface = folder.report.find(INTERFACE_MATCHES_SCHEMA);
    let state = FolderState::collect(ctx, folder);
    let safe_mismatches = state.safe_mismatches;
    let files_present = state.files.all_present();

    let components = match interface {
        Some(r) if !r.passed => component_names(&r.details),
        _ => Vec::new(),
    };
    // The schema index is only consulted when there are mismatches to explain.
    let schema_checks: Vec<SchemaCheck> = if components.is_empty() {
        Vec::new()
    } else {
        let index = match &state.conversation {
            Ok(record) => SchemaIndex::from_record(record),
            Err(_) => SchemaIndex::empty(),
        };
        components
            .iter()
            .map(|c| index.resolve(c).into_check(c))
            .collect()
    };

    let has_only_safe_issues = issues::classify(folder.filtered_issues.as_slice()).all_safe;
    let confidence = if has_only_safe_issues && files_present {
        Confidence::High
    } else {
        Confidence::Medium
    };
    let ready = confidence == Confidence::High && files_present;

    let mut notes: Vec<String> = Vec::new();
    if has_only_safe_issues {
        notes.push(format!(
            "Only safe issues ({} safe mismatches)",
            safe_mismatches
        ));
    } else {
        notes.push("Filtered issues need review".to_string());
    }
    if let Some(m) = missing_note(&state.files) {
        notes.push(m);
    }
    if !schema_checks.is_empty() {
        let flexible = schema_checks.iter().filter(|c| c.flexible).count();
        notes.push(format!(
            "{}/{} mismatched components allow additional properties",
            flexible,
            schema_checks.len()
        ));
    }
    let conversation_error = state.conversation.as_ref().err().cloned();
    if let Some(e) = &conversation_error {
        if schema_checks.is_empty() {
            notes.push(e.clone());
        } else {
            notes.push(format!("{}; schema checks unavailable ({})", e, NO_SCHEMA));
        }
    }

    let checklist = (!has_only_safe_issues).then(|| ChecklistEntry {
        folder_name: folder.folder_name.clone(),
        tier: 2,
        questions: TIER2_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        issues: folder
            .filtered_issues
            .iter()
            .cloned()
            .map(IssueItem::Text)
            .collect(),
    });

    Evaluation {
        verdict: Tier2Verdict {
            folder_name: folder.folder_name.clone(),
            confidence,
            ready,
            notes: notes.join("; "),
            has_only_safe_issues,
            safe_to_filter: has_only_safe_issues,
            safe_mismatches,
            files_present,
            schema_checks,
            conversation_error,
            weakness: state.weakness,
        },
        files: state.files,
        checklist,
    }
}

/// Sort critical issues into the tier-3 categories.
pub fn categorize(folder: &FolderReport) -> Tier3Issues {
    let mut issues = Tier3Issues {
        validation_error: folder.error.clone(),
        ..Tier3Issues::default()
    };
    for critical in &folder.critical_issues {
        match critical.check.as_str() {
            EXPORTS_INTERFACE => issues.missing_export_interface = true,
            NO_GENERIC_NODE_ATTRIBUTES => issues.generic_node_attribute = true,
            PROPS_MATCH_SCHEMA => issues.props_mismatch = true,
            INTERFACE_MATCHES_SCHEMA => issues.schema_mismatch = true,
            other => {
                if !issues.unrecognized.iter().any(|u| u == other) {
                    issues.unrecognized.push(other.to_string());
                }
            }
        }
    }
    issues
}

impl Tier3Issues {
    /// Only superficial categories present.
    pub fn fixable(&self) -> bool {
        (self.missing_export_interface || self.generic_node_attribute)
            && !self.props_mismatch
            && !self.schema_mismatch
            && self.unrecognized.is_empty()
    }

    /// Props diverge from the schema while the interface itself matches.
    pub fn disqualifying(&self) -> bool {
        self.props_mismatch && !self.schema_mismatch
    }

    fn labels(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.missing_export_interface {
            out.push("missing export interface");
        }
        if self.generic_node_attribute {
            out.push("generic node attribute");
        }
        if self.props_mismatch {
            out.push("props mismatch");
        }
        if self.schema_mismatch {
            out.push("schema mismatch");
        }
        out
    }
}

fn tier3_questions(
    issues: &Tier3Issues,
    weakness: &Weakness,
    conversation_read: bool,
) -> Vec<String> {
    let mut questions: Vec<String> = Vec::new();
    if issues.missing_export_interface {
        questions.push(EXPORT_INTERFACE_QUESTION.into());
    }
    if issues.generic_node_attribute {
        questions.push(GENERIC_NODE_QUESTION.into());
    }
    if issues.props_mismatch {
        questions.push(PROPS_MISMATCH_QUESTION.into());
    }
    if issues.schema_mismatch {
        questions.push(SCHEMA_MISMATCH_QUESTION.into());
    }
    if !issues.unrecognized.is_empty() {
        questions.push(format!(
            "Are the unrecognized failures acceptable ({})?",
            issues.unrecognized.join(", ")
        ));
    }
    if let Some(err) = &issues.validation_error {
        questions.push(format!(
            "Was the validation error caused by the dataset rather than the validator (\"{}\")?",
            err
        ));
    }
    // An unreadable record cannot prove its messages carry guidance.
    if weakness.flags.missing_grading_guidance || !conversation_read {
        questions.push(GRADING_GUIDANCE_QUESTION.into());
    }
    questions.push(REQUIRED_FILES_QUESTION.into());
    questions
}

pub fn evaluate_tier3(ctx: &EvalContext<'_>, folder: &FolderReport) -> Evaluation<Tier3Verdict> {
    let state = FolderState::collect(ctx, folder);
    let issues = categorize(folder);
    let fixable = issues.fixable();
    let disqualifying = issues.disqualifying();
    let confidence = if fixable {
        Confidence::Low
    } else {
        Confidence::VeryLow
    };

    let mut notes: Vec<String> = Vec::new();
    if fixable {
        notes.push(format!("Fixable: only {}", issues.labels().join(", ")));
    } else if disqualifying {
        notes.push("Disqualifying: props diverge from a matching interface".to_string());
    } else {
        let labels = issues.labels();
        if labels.is_empty() {
            notes.push("Critical issues outside known categories".to_string());
        } else {
            notes.push(format!("Needs review: {}", labels.join(", ")));
        }
    }
    if !issues.unrecognized.is_empty() {
        notes.push(format!("unrecognized checks: {}", issues.unrecognized.join(", ")));
    }
    if let Some(err) = &issues.validation_error {
        notes.push(format!("validator error: {}", err));
    }
    if let Some(m) = missing_note(&state.files) {
        notes.push(m);
    }
    if let Some(e) = state.conversation_error() {
        notes.push(e.to_string());
    }

    let mut raw: Vec<IssueItem> = folder
        .critical_issues
        .iter()
        .cloned()
        .map(IssueItem::Check)
        .collect();
    if let Some(err) = &folder.error {
        raw.push(IssueItem::Text(format!("Validation error: {}", err)));
    }
    let checklist = ChecklistEntry {
        folder_name: folder.folder_name.clone(),
        tier: 3,
        questions: tier3_questions(&issues, &state.weakness, state.conversation.is_ok()),
        issues: raw,
    };

    Evaluation {
        verdict: Tier3Verdict {
            folder_name: folder.folder_name.clone(),
            confidence,
            ready: false,
            notes: notes.join("; "),
            issues,
            fixable,
            disqualifying,
            files_present: state.files.all_present(),
            weakness: state.weakness,
        },
        files: state.files,
        checklist: Some(checklist),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckMetadata, CheckReport, CheckResult};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn dataset(folders: &[(&str, &[&str])]) -> TempDir {
        let dir = tempdir().unwrap();
        for (name, present) in folders {
            let folder = dir.path().join(name);
            fs::create_dir_all(&folder).unwrap();
            for file in *present {
                let body = if *file == files::CONVERSATION_JSON {
                    r#"{"conversation": []}"#
                } else {
                    "x"
                };
                fs::write(folder.join(file), body).unwrap();
            }
        }
        dir
    }

    const ALL: &[&str] = &[files::COMPONENTS_TS, files::CANVAS_HTML, files::CONVERSATION_JSON];

    fn folder(name: &str) -> FolderReport {
        FolderReport {
            folder_name: name.into(),
            ..FolderReport::default()
        }
    }

    fn failed(check: &str, details: &[&str]) -> CheckResult {
        CheckResult {
            check: check.into(),
            passed: false,
            details: details.iter().map(|d| d.to_string()).collect(),
            metadata: None,
        }
    }

    #[test]
    fn test_tier1_ready_tracks_file_presence() {
        let dir = dataset(&[("full", ALL), ("partial", &[files::COMPONENTS_TS, files::CONVERSATION_JSON])]);
        let scoring = ScoringConfig::default();
        let ctx = EvalContext {
            datasets_root: dir.path(),
            scoring: &scoring,
        };
        let full = evaluate_tier1(&ctx, &folder("full"));
        assert!(full.verdict.ready);
        assert_eq!(full.verdict.confidence, Confidence::VeryHigh);
        assert_eq!(full.verdict.notes, "All checks passed, files present");
        assert!(full.checklist.is_none());

        let partial = evaluate_tier1(&ctx, &folder("partial"));
        assert!(!partial.verdict.ready);
        assert_eq!(partial.verdict.confidence, Confidence::VeryHigh);
        assert_eq!(
            partial.verdict.notes,
            "All checks passed, but files missing: canvas.html"
        );
    }

    #[test]
    fn test_component_names_are_distinct_and_ordered() {
        let details = vec![
            "Card.title: missing".to_string(),
            "Badge.label: wrong type".to_string(),
            "Card.body.text: extra".to_string(),
            "no component prefix".to_string(),
        ];
        assert_eq!(component_names(&details), vec!["Card", "Badge"]);

        let details = vec![
            "Card: interface missing".to_string(),
            "See v1.2 notes. Badge.label: wrong type".to_string(),
        ];
        assert_eq!(component_names(&details), vec!["Card", "Badge"]);
    }

    #[test]
    fn test_tier1_notes_show_malformed_conversation() {
        let dir = dataset(&[("t1", &[files::COMPONENTS_TS, files::CANVAS_HTML])]);
        fs::write(dir.path().join("t1").join(files::CONVERSATION_JSON), "{ nope").unwrap();
        let scoring = ScoringConfig::default();
        let ctx = EvalContext {
            datasets_root: dir.path(),
            scoring: &scoring,
        };
        let ev = evaluate_tier1(&ctx, &folder("t1"));
        assert!(ev.verdict.ready);
        assert!(ev
            .verdict
            .notes
            .starts_with("All checks passed, files present; conversation record malformed"));

        let missing = dataset(&[("gone", &[files::COMPONENTS_TS])]);
        let ctx = EvalContext {
            datasets_root: missing.path(),
            scoring: &scoring,
        };
        let ev = evaluate_tier1(&ctx, &folder("gone"));
        assert!(ev.verdict.notes.ends_with("; conversation record missing"));
    }

    #[test]
    fn test_safe_mismatches_score_in_every_tier() {
        let dir = dataset(&[("t1", ALL), ("t3", ALL)]);
        let scoring = ScoringConfig::default();
        let ctx = EvalContext {
            datasets_root: dir.path(),
            scoring: &scoring,
        };
        let interface = CheckResult {
            check: INTERFACE_MATCHES_SCHEMA.into(),
            passed: true,
            details: Vec::new(),
            metadata: Some(CheckMetadata {
                total_safe_mismatches: Some(5),
                ..CheckMetadata::default()
            }),
        };

        let mut t1 = folder("t1");
        t1.report.results = vec![interface.clone()];
        let baseline = evaluate_tier1(&ctx, &folder("t1")).verdict.weakness.score;
        let w = evaluate_tier1(&ctx, &t1).verdict.weakness;
        assert_eq!(w.signals.safe_mismatches, 5);
        assert!((w.score - baseline - 5.0 * scoring.safe_mismatch_weight).abs() < 1e-9);

        let mut t3 = folder("t3");
        t3.report.results = vec![interface];
        t3.critical_issues = vec![failed(EXPORTS_INTERFACE, &[])];
        let w = evaluate_tier3(&ctx, &t3).verdict.weakness;
        assert_eq!(w.signals.safe_mismatches, 5);
        assert!((w.score - baseline - 5.0 * scoring.safe_mismatch_weight).abs() < 1e-9);
    }

    #[test]
    fn test_tier2_safe_issues_and_files_make_ready() {
        let dir = dataset(&[("ok", ALL)]);
        let scoring = ScoringConfig::default();
        let ctx = EvalContext {
            datasets_root: dir.path(),
            scoring: &scoring,
        };
        let mut f = folder("ok");
        f.filtered_issues = vec!["No matching schema found for Card".into()];
        let ev = evaluate_tier2(&ctx, &f);
        assert!(ev.verdict.ready);
        assert!(ev.verdict.safe_to_filter);
        assert_eq!(ev.verdict.confidence, Confidence::High);
        assert!(ev.checklist.is_none());
    }

    #[test]
    fn test_tier2_not_ready_without_files_even_if_safe() {
        let dir = dataset(&[("nofiles", &[])]);
        let scoring = ScoringConfig::default();
        let ctx = EvalContext {
            datasets_root: dir.path(),
            scoring: &scoring,
        };
        let ev = evaluate_tier2(&ctx, &folder("nofiles"));
        assert!(ev.verdict.has_only_safe_issues);
        assert!(!ev.verdict.ready);
        assert_eq!(ev.verdict.confidence, Confidence::Medium);
        assert!(ev.checklist.is_none());
        assert_eq!(
            ev.verdict.conversation_error.as_deref(),
            Some("conversation record missing")
        );
    }

    #[test]
    fn test_tier2_unsafe_issue_enters_checklist() {
        let dir = dataset(&[("bad", ALL)]);
        let scoring = ScoringConfig::default();
        let ctx = EvalContext {
            datasets_root: dir.path(),
            scoring: &scoring,
        };
        let mut f = folder("bad");
        f.filtered_issues = vec![
            "No matching schema found for Card".into(),
            "Type mismatch on field y".into(),
        ];
        let ev = evaluate_tier2(&ctx, &f);
        assert!(!ev.verdict.ready);
        assert!(!ev.verdict.safe_to_filter);
        let entry = ev.checklist.unwrap();
        assert_eq!(entry.tier, 2);
        assert_eq!(entry.questions.len(), 3);
        assert_eq!(entry.issues.len(), 2);
    }

    #[test]
    fn test_tier2_resolves_schema_for_mismatched_components() {
        let dir = dataset(&[("schema", &[files::COMPONENTS_TS, files::CANVAS_HTML])]);
        fs::write(
            dir.path().join("schema").join(files::CONVERSATION_JSON),
            r#"{
                "componentsSchema": { "$defs": {
                    "CardProps": { "properties": { "props": { "additionalProperties": false } } },
                    "BadgeProps": { "properties": { "props": {} } }
                } },
                "conversation": []
            }"#,
        )
        .unwrap();
        let scoring = ScoringConfig::default();
        let ctx = EvalContext {
            datasets_root: dir.path(),
            scoring: &scoring,
        };
        let mut f = folder("schema");
        f.report = CheckReport {
            results: vec![CheckResult {
                metadata: Some(CheckMetadata {
                    total_safe_mismatches: Some(2),
                    ..CheckMetadata::default()
                }),
                ..failed(
                    INTERFACE_MATCHES_SCHEMA,
                    &["Card.title: missing", "Badge.x: extra", "Ghost.y: extra"],
                )
            }],
        };
        let ev = evaluate_tier2(&ctx, &f);
        let flags: Vec<(&str, bool)> = ev
            .verdict
            .schema_checks
            .iter()
            .map(|c| (c.component.as_str(), c.flexible))
            .collect();
        assert_eq!(flags, vec![("Card", false), ("Badge", true), ("Ghost", false)]);
        assert_eq!(ev.verdict.schema_checks[2].reason, crate::schema::KEY_NOT_FOUND);
        assert_eq!(ev.verdict.safe_mismatches, 2);
        assert!(ev.verdict.notes.contains("1/3 mismatched components"));
    }

    #[test]
    fn test_tier2_malformed_conversation_falls_back_to_rigid() {
        let dir = dataset(&[("broken", &[files::COMPONENTS_TS, files::CANVAS_HTML])]);
        fs::write(dir.path().join("broken").join(files::CONVERSATION_JSON), "{ nope").unwrap();
        let scoring = ScoringConfig::default();
        let ctx = EvalContext {
            datasets_root: dir.path(),
            scoring: &scoring,
        };
        let mut f = folder("broken");
        f.report.results = vec![failed(INTERFACE_MATCHES_SCHEMA, &["Card.title: missing"])];
        let ev = evaluate_tier2(&ctx, &f);
        assert_eq!(
            ev.verdict.schema_checks,
            vec![SchemaCheck {
                component: "Card".into(),
                flexible: false,
                reason: NO_SCHEMA.into(),
            }]
        );
        assert!(ev.verdict.notes.contains("conversation record malformed"));
        assert!(ev.verdict.notes.contains("schema checks unavailable"));
    }

    #[test]
    fn test_tier3_categories_drive_fixable_and_disqualifying() {
        let mut f = folder("t3");
        f.critical_issues = vec![
            failed(EXPORTS_INTERFACE, &[]),
            failed(NO_GENERIC_NODE_ATTRIBUTES, &[]),
        ];
        let cats = categorize(&f);
        assert!(cats.fixable());
        assert!(!cats.disqualifying());

        f.critical_issues.push(failed(PROPS_MATCH_SCHEMA, &[]));
        let cats = categorize(&f);
        assert!(!cats.fixable());
        assert!(cats.disqualifying());

        f.critical_issues.push(failed(INTERFACE_MATCHES_SCHEMA, &[]));
        let cats = categorize(&f);
        assert!(!cats.fixable());
        assert!(!cats.disqualifying());

        let mut odd = folder("odd");
        odd.critical_issues = vec![failed(EXPORTS_INTERFACE, &[]), failed("Renders canvas", &[])];
        let cats = categorize(&odd);
        assert!(!cats.fixable());
        assert_eq!(cats.unrecognized, vec!["Renders canvas"]);
    }

    #[test]
    fn test_tier3_always_reviewed_with_category_questions() {
        let dir = dataset(&[("t3", ALL)]);
        let scoring = ScoringConfig::default();
        let ctx = EvalContext {
            datasets_root: dir.path(),
            scoring: &scoring,
        };
        let mut f = folder("t3");
        f.critical_issues = vec![failed(EXPORTS_INTERFACE, &["Card: no export"])];
        f.error = Some("timeout".into());
        let ev = evaluate_tier3(&ctx, &f);
        assert!(!ev.verdict.ready);
        assert!(ev.verdict.fixable);
        assert_eq!(ev.verdict.confidence, Confidence::Low);
        let entry = ev.checklist.unwrap();
        assert_eq!(entry.questions.first().map(String::as_str), Some(EXPORT_INTERFACE_QUESTION));
        assert_eq!(entry.questions.last().map(String::as_str), Some(REQUIRED_FILES_QUESTION));
        assert!(!entry.questions.iter().any(|q| q == PROPS_MISMATCH_QUESTION));
        assert!(entry.questions.iter().any(|q| q.contains("timeout")));
        assert_eq!(entry.issues.len(), 2);
        assert_eq!(entry.issues[1].render(), "Validation error: timeout");

        let mut deep = folder("t3");
        deep.critical_issues = vec![failed(PROPS_MATCH_SCHEMA, &[])];
        let ev = evaluate_tier3(&ctx, &deep);
        assert_eq!(ev.verdict.confidence, Confidence::VeryLow);
        assert!(ev.verdict.disqualifying);
        assert!(ev.verdict.notes.starts_with("Disqualifying"));
    }

    #[test]
    fn test_tier3_malformed_conversation_is_noted_and_questioned() {
        let dir = dataset(&[("t3", &[files::COMPONENTS_TS, files::CANVAS_HTML])]);
        fs::write(dir.path().join("t3").join(files::CONVERSATION_JSON), "{ nope").unwrap();
        let scoring = ScoringConfig::default();
        let ctx = EvalContext {
            datasets_root: dir.path(),
            scoring: &scoring,
        };
        let mut f = folder("t3");
        f.critical_issues = vec![failed(EXPORTS_INTERFACE, &[])];
        let ev = evaluate_tier3(&ctx, &f);
        assert!(ev.verdict.notes.contains("conversation record malformed"));
        assert!(ev.verdict.fixable);
        let entry = ev.checklist.unwrap();
        assert!(entry.questions.iter().any(|q| q == GRADING_GUIDANCE_QUESTION));
    }
}

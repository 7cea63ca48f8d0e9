//! Markdown rendering of the folders that still need a human decision.

use crate::models::analysis::ChecklistEntry;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

pub const NO_REVIEW_NEEDED: &str = "No manual review required.";

/// Render the checklist document.
///
/// Layout: title, per-tier summary counts, then one `## ` section per
/// entry in input order with unchecked questions and raw issues. With no
/// entries the document carries [`NO_REVIEW_NEEDED`] and no sections.
pub fn render(entries: &[ChecklistEntry], generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("# Review checklist\n\n");
    let _ = writeln!(out, "Generated: {}\n", generated_at.to_rfc3339());

    let tier2 = entries.iter().filter(|e| e.tier == 2).count();
    let tier3 = entries.iter().filter(|e| e.tier == 3).count();
    out.push_str("Summary:\n");
    let _ = writeln!(out, "- Tier 2 folders to review: {}", tier2);
    let _ = writeln!(out, "- Tier 3 folders to review: {}", tier3);
    let _ = writeln!(out, "- Total: {}\n", entries.len());

    if entries.is_empty() {
        out.push_str(NO_REVIEW_NEEDED);
        out.push('\n');
        return out;
    }

    for entry in entries {
        let _ = writeln!(out, "## {} (Tier {})\n", entry.folder_name, entry.tier);
        for q in &entry.questions {
            let _ = writeln!(out, "- [ ] {}", q);
        }
        if !entry.issues.is_empty() {
            out.push_str("\nIssues:\n");
            for issue in &entry.issues {
                let _ = writeln!(out, "  - {}", issue.render());
            }
        }
        out.push('\n');
    }
    out
}

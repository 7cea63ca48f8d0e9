//! Partition of filtered issues into forgivable and review-worthy.

/// Validator text emitted when a component has no schema definition at all.
pub const SAFE_MARKER: &str = "No matching schema found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueClass {
    /// Known to be harmless.
    Safe,
    NeedsReview,
}

/// Only issues carrying [`SAFE_MARKER`] (case-sensitive) are safe.
pub fn classify_one(issue: &str) -> IssueClass {
    if issue.contains(SAFE_MARKER) {
        IssueClass::Safe
    } else {
        IssueClass::NeedsReview
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub all_safe: bool,
    pub safe: usize,
    pub needs_review: usize,
}

/// Classify a list of issues; an empty list is all-safe.
pub fn classify<S: AsRef<str>>(issues: &[S]) -> Classification {
    let safe = issues
        .iter()
        .filter(|i| classify_one(i.as_ref()) == IssueClass::Safe)
        .count();
    let needs_review = issues.len() - safe;
    Classification {
        all_safe: needs_review == 0,
        safe,
        needs_review,
    }
}

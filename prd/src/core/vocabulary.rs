//! Fixed lookup tables shared by extraction, recovery, and merge.
//!
//! Every key list is a priority order: scans walk it front to back and the
//! first acceptable value wins.

/// Top-level keys a writer may nest the entry array under.
pub const WRAPPER_KEYS: &[&str] = &["features", "items", "entries", "prd", "tasks", "requirements"];

pub const DESCRIPTION_KEYS: &[&str] = &["description", "desc", "name", "title", "task", "feature"];

pub const PASSES_KEYS: &[&str] = &[
    "passes",
    "pass",
    "passed",
    "done",
    "complete",
    "completed",
    "status",
    "finished",
];

pub const CATEGORY_KEYS: &[&str] = &["category", "cat", "type", "id"];

pub const STEPS_KEYS: &[&str] = &["steps", "verification", "checks", "tasks"];

/// Lower-cased string values read as `passes: true`.
pub const TRUTHY_TOKENS: &[&str] = &[
    "true",
    "pass",
    "passed",
    "done",
    "complete",
    "completed",
    "finished",
];

/// Lower-cased string values read as `passes: false` during recovery.
pub const FALSY_TOKENS: &[&str] = &["false", "fail", "failed", "pending", "incomplete"];

/// Step assigned to recovered entries that carried no usable steps.
pub const DEFAULT_RECOVERED_STEP: &str = "Verify this requirement works as described";

/// A similarity score must exceed this to count as a match.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Words shorter than this are ignored by the similarity score.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Characters of an unmatched description quoted in merge warnings.
pub const WARNING_PREVIEW_CHARS: usize = 50;

pub fn is_truthy_token(value: &str) -> bool {
    TRUTHY_TOKENS.contains(&value.to_lowercase().as_str())
}

pub fn is_falsy_token(value: &str) -> bool {
    FALSY_TOKENS.contains(&value.to_lowercase().as_str())
}

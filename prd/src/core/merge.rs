//! Forward completion flags from a corrupted rewrite onto a trusted baseline.
//!
//! The corrupted side is only trusted for one kind of claim: "task X is done".
//! The merge can set `passes` on an existing baseline entry. It never clears a
//! flag, rewrites text, reorders, removes, or adds entries.

use std::collections::HashSet;

use serde_json::Value;

use crate::core::extract::extract_items;
use crate::core::vocabulary::{MIN_TOKEN_CHARS, SIMILARITY_THRESHOLD, WARNING_PREVIEW_CHARS};
use crate::entry::Entry;

/// Tunables for [`smart_merge_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// Jaccard score a candidate must exceed to match a baseline entry.
    pub similarity_threshold: f64,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: SIMILARITY_THRESHOLD,
        }
    }
}

/// Outcome of a merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    /// Independent copy of the baseline with forwarded flags applied.
    pub merged: Vec<Entry>,
    /// Entries flipped from `passes=false` to `passes=true`.
    pub items_updated: usize,
    /// One message per completed candidate that matched nothing.
    pub warnings: Vec<String>,
}

/// Merge with the default similarity threshold.
pub fn smart_merge(baseline: &[Entry], corrupted: &Value) -> MergeResult {
    smart_merge_with(baseline, corrupted, &MergeOptions::default())
}

pub fn smart_merge_with(baseline: &[Entry], corrupted: &Value, options: &MergeOptions) -> MergeResult {
    let mut merged = baseline.to_vec();
    let mut items_updated = 0;
    let mut warnings = Vec::new();

    for candidate in extract_items(corrupted).into_iter().filter(|item| item.passes) {
        match best_match(&merged, &candidate.description, options.similarity_threshold) {
            Some(idx) => {
                let entry = &mut merged[idx];
                if !entry.passes {
                    entry.passes = true;
                    items_updated += 1;
                }
            }
            None => warnings.push(format!(
                "No matching entry for completed item \"{}\"",
                preview(&candidate.description)
            )),
        }
    }

    MergeResult {
        merged,
        items_updated,
        warnings,
    }
}

/// Index of the baseline entry best matching `description`.
///
/// A substring relation in either direction matches immediately. Otherwise the
/// highest similarity wins (earliest on ties) if it exceeds `threshold`.
fn best_match(entries: &[Entry], description: &str, threshold: f64) -> Option<usize> {
    let candidate_words = word_set(description);
    let mut best: Option<(usize, f64)> = None;

    for (idx, entry) in entries.iter().enumerate() {
        if entry.description.contains(description) || description.contains(entry.description.as_str()) {
            return Some(idx);
        }
        let score = jaccard(&candidate_words, &word_set(&entry.description));
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }

    best.filter(|(_, score)| *score > threshold)
        .map(|(idx, _)| idx)
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn preview(text: &str) -> String {
    text.chars().take(WARNING_PREVIEW_CHARS).collect()
}

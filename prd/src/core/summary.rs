//! Completion counts for `prd status`.

use std::collections::BTreeMap;

use crate::entry::{Category, Entry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCount {
    pub passing: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrdSummary {
    pub total: usize,
    pub passing: usize,
    /// Only categories that appear in the document, in vocabulary order.
    pub by_category: BTreeMap<Category, CategoryCount>,
}

impl PrdSummary {
    /// True when the document has entries and all of them pass.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.passing == self.total
    }
}

pub fn summarize(entries: &[Entry]) -> PrdSummary {
    let mut summary = PrdSummary::default();
    for entry in entries {
        let count = summary.by_category.entry(entry.category).or_default();
        count.total += 1;
        summary.total += 1;
        if entry.passes {
            count.passing += 1;
            summary.passing += 1;
        }
    }
    summary
}

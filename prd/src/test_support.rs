//! Test-only helpers for constructing documents.

use crate::entry::{Category, Entry};

/// Open `feature` entry with one step.
pub fn entry(description: &str) -> Entry {
    Entry::new(
        Category::Feature,
        description,
        vec![format!("verify {}", description)],
    )
}

/// Same as [`entry`] with `passes=true`.
pub fn passing(description: &str) -> Entry {
    Entry {
        passes: true,
        ..entry(description)
    }
}

/// Small mixed document covering several categories and both pass states.
pub fn sample_document() -> Vec<Entry> {
    vec![
        Entry {
            passes: true,
            ..Entry::new(
                Category::Setup,
                "Initialize project skeleton",
                vec!["cargo build succeeds".to_string()],
            )
        },
        Entry::new(
            Category::Feature,
            "Add login form",
            vec![
                "render email and password fields".to_string(),
                "submit posts credentials".to_string(),
            ],
        ),
        Entry::new(Category::Docs, "Document the CLI", Vec::new()),
    ]
}

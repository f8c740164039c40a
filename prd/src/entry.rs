use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed vocabulary of task categories.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ui,
    Feature,
    Bugfix,
    Setup,
    Development,
    Testing,
    Docs,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Ui,
        Category::Feature,
        Category::Bugfix,
        Category::Setup,
        Category::Development,
        Category::Testing,
        Category::Docs,
    ];

    /// Exact, case-sensitive lookup in the vocabulary.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Ui => "ui",
            Category::Feature => "feature",
            Category::Bugfix => "bugfix",
            Category::Setup => "setup",
            Category::Development => "development",
            Category::Testing => "testing",
            Category::Docs => "docs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One task in the requirements document.
///
/// Field order is the on-disk key order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub category: Category,
    pub description: String,
    pub steps: Vec<String>,
    pub passes: bool,
}

impl Entry {
    pub fn new(category: Category, description: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            category,
            description: description.into(),
            steps,
            passes: false,
        }
    }
}

/// Comma-separated vocabulary, for error messages and prompts.
pub fn category_list() -> String {
    Category::ALL
        .iter()
        .map(|category| category.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

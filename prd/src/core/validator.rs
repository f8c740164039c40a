//! Strict structural validation of a parsed requirements document.
//!
//! Every element is checked independently and every failing field produces its
//! own message, so the agent can fix all problems in one pass. Any error voids
//! the whole document: partially valid entries are never returned from here.

use serde_json::{Map, Value};

use crate::entry::{Category, Entry, category_list};

/// Outcome of [`validate_prd`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    /// Human-readable messages with 1-based item indices.
    pub errors: Vec<String>,
    /// Present only when `valid`.
    pub data: Option<Vec<Entry>>,
}

impl ValidationResult {
    fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
            data: None,
        }
    }
}

/// Validate a parsed JSON/YAML value against the document contract.
pub fn validate_prd(value: &Value) -> ValidationResult {
    let Value::Array(items) = value else {
        return ValidationResult::invalid(vec!["PRD must be an array".to_string()]);
    };

    let mut errors = Vec::new();
    let mut entries = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let label = format!("Item {}", idx + 1);
        let Value::Object(fields) = item else {
            errors.push(format!("{label}: must be an object"));
            continue;
        };
        if let Some(entry) = validate_entry(&label, fields, &mut errors) {
            entries.push(entry);
        }
    }

    if !errors.is_empty() {
        return ValidationResult::invalid(errors);
    }
    ValidationResult {
        valid: true,
        errors,
        data: Some(entries),
    }
}

/// Check all four fields, pushing one message per failure.
///
/// Returns the typed entry only when this element produced no errors.
fn validate_entry(label: &str, fields: &Map<String, Value>, errors: &mut Vec<String>) -> Option<Entry> {
    let before = errors.len();

    let category = match fields.get("category") {
        Some(Value::String(raw)) => {
            let parsed = Category::parse(raw);
            if parsed.is_none() {
                errors.push(format!(
                    "{label}: invalid category \"{raw}\" (expected one of: {})",
                    category_list()
                ));
            }
            parsed
        }
        Some(other) => {
            errors.push(format!(
                "{label}: invalid category {other} (expected one of: {})",
                category_list()
            ));
            None
        }
        None => {
            errors.push(format!("{label}: missing category"));
            None
        }
    };

    let description = match fields.get("description") {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => {
            errors.push(format!("{label}: description must be a non-empty string"));
            None
        }
    };

    let steps = match fields.get("steps") {
        Some(Value::Array(raw_steps)) => {
            let mut steps = Vec::with_capacity(raw_steps.len());
            for (step_idx, step) in raw_steps.iter().enumerate() {
                match step {
                    Value::String(text) => steps.push(text.clone()),
                    _ => errors.push(format!("{label}: step {} must be a string", step_idx + 1)),
                }
            }
            Some(steps)
        }
        _ => {
            errors.push(format!("{label}: steps must be an array"));
            None
        }
    };

    let passes = match fields.get("passes") {
        Some(Value::Bool(flag)) => Some(*flag),
        _ => {
            errors.push(format!("{label}: passes must be a boolean"));
            None
        }
    };

    if errors.len() != before {
        return None;
    }
    Some(Entry {
        category: category?,
        description: description?,
        steps: steps?,
        passes: passes?,
    })
}

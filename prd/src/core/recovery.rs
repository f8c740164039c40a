//! Whole-document reconstruction from a malformed rewrite.
//!
//! Recovery is all-or-nothing: one element that cannot be turned into a valid
//! [`Entry`] voids the attempt. Callers fall back to a backup or the bootstrap
//! template when this returns `None`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::extract::{first_bool, first_non_empty_string, unwrap_wrapper};
use crate::core::vocabulary::{
    CATEGORY_KEYS, DEFAULT_RECOVERED_STEP, DESCRIPTION_KEYS, PASSES_KEYS, STEPS_KEYS,
    is_falsy_token, is_truthy_token,
};
use crate::entry::{Category, Entry};

/// Rebuild a fully valid document from `value`, or `None`.
pub fn attempt_recovery(value: &Value) -> Option<Vec<Entry>> {
    match value {
        Value::Object(fields) => recover_array(unwrap_wrapper(fields)?),
        Value::Array(items) => recover_array(items),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
    }
}

fn recover_array(items: &[Value]) -> Option<Vec<Entry>> {
    let mut entries = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            debug!(item = idx + 1, "recovery failed: element is not an object");
            return None;
        };
        let Some(entry) = recover_entry(fields) else {
            debug!(item = idx + 1, "recovery failed: no category or description");
            return None;
        };
        entries.push(entry);
    }
    if entries.is_empty() {
        return None;
    }
    Some(entries)
}

fn recover_entry(fields: &Map<String, Value>) -> Option<Entry> {
    let category = recover_category(fields)?;
    let description = first_non_empty_string(fields, DESCRIPTION_KEYS)?.to_string();
    let steps =
        recover_steps(fields).unwrap_or_else(|| vec![DEFAULT_RECOVERED_STEP.to_string()]);
    let passes = first_bool(fields, PASSES_KEYS)
        .or_else(|| passes_from_token(fields))
        .unwrap_or(false);
    Some(Entry {
        category,
        description,
        steps,
        passes,
    })
}

fn recover_category(fields: &Map<String, Value>) -> Option<Category> {
    CATEGORY_KEYS.iter().find_map(|key| match fields.get(*key) {
        Some(Value::String(raw)) => Category::parse(raw),
        _ => None,
    })
}

/// First synonym holding an array with at least one string member.
fn recover_steps(fields: &Map<String, Value>) -> Option<Vec<String>> {
    STEPS_KEYS.iter().find_map(|key| {
        let Some(Value::Array(raw)) = fields.get(*key) else {
            return None;
        };
        let steps: Vec<String> = raw
            .iter()
            .filter_map(|step| match step {
                Value::String(text) => Some(text.clone()),
                _ => None,
            })
            .collect();
        (!steps.is_empty()).then_some(steps)
    })
}

/// First synonym holding a recognized truthy or falsy token.
fn passes_from_token(fields: &Map<String, Value>) -> Option<bool> {
    PASSES_KEYS.iter().find_map(|key| match fields.get(*key) {
        Some(Value::String(text)) if is_truthy_token(text) => Some(true),
        Some(Value::String(text)) if is_falsy_token(text) => Some(false),
        _ => None,
    })
}

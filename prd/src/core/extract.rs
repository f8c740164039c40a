//! Best-effort extraction of `{description, passes}` facts from untrusted input.
//!
//! Unlike [`crate::core::recovery`], extraction never fails as a whole: items
//! without a usable description are dropped and everything else is kept.

use serde_json::{Map, Value};

use crate::core::vocabulary::{DESCRIPTION_KEYS, PASSES_KEYS, WRAPPER_KEYS, is_truthy_token};

/// Minimal fact pulled from an untrusted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    pub description: String,
    pub passes: bool,
}

/// Pull every recognizable item out of `value`, in input order.
pub fn extract_items(value: &Value) -> Vec<ExtractedItem> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => extract_all(items),
        Value::Object(fields) => match unwrap_wrapper(fields) {
            Some(items) => extract_all(items),
            None => extract_item(value).into_iter().collect(),
        },
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Vec::new(),
    }
}

fn extract_all(items: &[Value]) -> Vec<ExtractedItem> {
    items.iter().filter_map(extract_item).collect()
}

fn extract_item(value: &Value) -> Option<ExtractedItem> {
    let Value::Object(fields) = value else {
        return None;
    };
    let description = first_non_empty_string(fields, DESCRIPTION_KEYS)?;
    let passes = first_bool(fields, PASSES_KEYS)
        .unwrap_or_else(|| has_truthy_string(fields, PASSES_KEYS));
    Some(ExtractedItem {
        description: description.to_string(),
        passes,
    })
}

/// First wrapper key (in priority order) whose value is an array.
///
/// Later keys are never consulted once one matches, even if its array is empty.
pub(crate) fn unwrap_wrapper(fields: &Map<String, Value>) -> Option<&Vec<Value>> {
    WRAPPER_KEYS.iter().find_map(|key| match fields.get(*key) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    })
}

pub(crate) fn first_non_empty_string<'a>(
    fields: &'a Map<String, Value>,
    keys: &[&str],
) -> Option<&'a str> {
    keys.iter().find_map(|key| match fields.get(*key) {
        Some(Value::String(text)) if !text.is_empty() => Some(text.as_str()),
        _ => None,
    })
}

pub(crate) fn first_bool(fields: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|key| match fields.get(*key) {
        Some(Value::Bool(flag)) => Some(*flag),
        _ => None,
    })
}

fn has_truthy_string(fields: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|key| match fields.get(*key) {
        Some(Value::String(text)) => is_truthy_token(text),
        _ => false,
    })
}

//! `@{path}` inclusion markers.
//!
//! Expansion never fails: unreadable targets become bracketed placeholders so
//! the surrounding document stays well-formed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::entry::Entry;

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\{([^}]+)\}").expect("marker pattern should be valid"));

/// Replace every `@{path}` in `text` with the file's contents.
///
/// Relative paths resolve against `base_dir`. Inserted contents are not
/// scanned again.
pub fn expand_file_references(text: &str, base_dir: &Path) -> String {
    MARKER_RE
        .replace_all(text, |caps: &Captures<'_>| {
            read_reference(&resolve(&caps[1], base_dir))
        })
        .into_owned()
}

/// Expand markers in every description and step, returning a new document.
pub fn expand_prd_file_references(entries: &[Entry], base_dir: &Path) -> Vec<Entry> {
    entries
        .iter()
        .map(|entry| Entry {
            category: entry.category,
            description: expand_file_references(&entry.description, base_dir),
            steps: entry
                .steps
                .iter()
                .map(|step| expand_file_references(step, base_dir))
                .collect(),
            passes: entry.passes,
        })
        .collect()
}

fn resolve(reference: &str, base_dir: &Path) -> PathBuf {
    let path = Path::new(reference);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn read_reference(path: &Path) -> String {
    if !path.exists() {
        return format!("[File not found: {}]", path.display());
    }
    match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "reference unreadable");
            format!("[Error reading: {}]", path.display())
        }
    }
}

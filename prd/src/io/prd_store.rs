//! Document location, format-aware reads, and whole-file writes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::write_atomic;
use crate::core::validator::validate_prd;
use crate::entry::Entry;

/// On-disk encoding of a document, chosen by file extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` / `.yml` read as YAML, anything else as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Canonical paths within `.prd/` for a project root.
#[derive(Debug, Clone)]
pub struct PrdPaths {
    pub root: PathBuf,
    pub prd_dir: PathBuf,
    pub yaml_path: PathBuf,
    pub yml_path: PathBuf,
    pub json_path: PathBuf,
    pub config_path: PathBuf,
}

impl PrdPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let prd_dir = root.join(".prd");
        Self {
            root,
            yaml_path: prd_dir.join("prd.yaml"),
            yml_path: prd_dir.join("prd.yml"),
            json_path: prd_dir.join("prd.json"),
            config_path: prd_dir.join("config.toml"),
            prd_dir,
        }
    }

    /// Existing document, preferring YAML over JSON when both are present.
    pub fn document(&self) -> Option<PathBuf> {
        [&self.yaml_path, &self.yml_path, &self.json_path]
            .into_iter()
            .find(|path| path.is_file())
            .cloned()
    }

    /// Path to create when no document exists yet.
    pub fn default_document(&self, format: DocumentFormat) -> PathBuf {
        match format {
            DocumentFormat::Json => self.json_path.clone(),
            DocumentFormat::Yaml => self.yaml_path.clone(),
        }
    }
}

/// Parsed document alongside the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct PrdFile {
    /// Untyped parse result; not yet validated.
    pub content: Value,
    pub raw: String,
}

/// Read and parse a document, choosing the parser by extension.
///
/// Returns `None` when the file cannot be read or parsed.
pub fn read_prd_file(path: &Path) -> Option<PrdFile> {
    read_with(path, DocumentFormat::from_path(path))
}

/// Read and parse a document as YAML regardless of extension.
pub fn read_yaml_prd_file(path: &Path) -> Option<PrdFile> {
    read_with(path, DocumentFormat::Yaml)
}

fn read_with(path: &Path, format: DocumentFormat) -> Option<PrdFile> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "document unreadable");
            return None;
        }
    };
    let content = parse_prd_text(&raw, format)?;
    Some(PrdFile { content, raw })
}

/// Parse document text into an untyped value, or `None` on malformed input.
pub fn parse_prd_text(raw: &str, format: DocumentFormat) -> Option<Value> {
    let parsed = match format {
        DocumentFormat::Json => serde_json::from_str::<Value>(raw).map_err(|err| err.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(raw).map_err(|err| err.to_string()),
    };
    match parsed {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(?format, %error, "document parse failed");
            None
        }
    }
}

/// Load a document that must already be valid.
pub fn load_prd(path: &Path) -> Result<Vec<Entry>> {
    let file = read_prd_file(path)
        .ok_or_else(|| anyhow!("read or parse document {}", path.display()))?;
    let result = validate_prd(&file.content);
    result.data.ok_or_else(|| {
        anyhow!(
            "document {} failed validation: {}",
            path.display(),
            result.errors.join("; ")
        )
    })
}

/// Write the document as pretty JSON (two-space indent, trailing newline).
///
/// The file is replaced in one rename; readers never see a partial document.
pub fn write_prd(path: &Path, entries: &[Entry]) -> Result<()> {
    debug!(path = %path.display(), entries = entries.len(), "writing document");
    let mut buf = serde_json::to_string_pretty(entries).context("serialize document")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_document;
    use serde_json::json;

    /// Verifies write → read → validate returns the same entries.
    #[test]
    fn write_then_read_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.json");
        let doc = sample_document();

        write_prd(&path, &doc).expect("write");
        let file = read_prd_file(&path).expect("read");
        assert_eq!(validate_prd(&file.content).data, Some(doc));
    }

    #[test]
    fn write_uses_two_space_indent_and_trailing_newline() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.json");
        write_prd(&path, &sample_document()[2..]).expect("write");
        let contents = fs::read_to_string(&path).expect("read");
        let expected = "[\n  {\n    \"category\": \"docs\",\n    \"description\": \"Document the CLI\",\n    \"steps\": [],\n    \"passes\": false\n  }\n]\n";
        assert_eq!(contents, expected);
        assert!(!temp.path().join("prd.json.tmp").exists());
    }

    /// JSON output is valid YAML, so YAML-named documents round-trip too.
    #[test]
    fn yaml_named_document_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.yaml");
        write_prd(&path, &sample_document()).expect("write");
        let file = read_prd_file(&path).expect("read");
        assert_eq!(validate_prd(&file.content).data, Some(sample_document()));
    }

    #[test]
    fn reads_yaml_by_extension() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.yml");
        let raw = "- category: ui\n  description: Dark mode\n  steps:\n    - toggle it\n  passes: true\n";
        fs::write(&path, raw).expect("write");

        let file = read_prd_file(&path).expect("read");
        assert_eq!(file.raw, raw);
        assert_eq!(
            file.content,
            json!([{"category": "ui", "description": "Dark mode", "steps": ["toggle it"], "passes": true}])
        );
    }

    #[test]
    fn malformed_or_missing_input_returns_none() {
        let temp = tempfile::tempdir().expect("tempdir");
        let json_path = temp.path().join("prd.json");
        fs::write(&json_path, "[{\"category\": \"ui\",").expect("write");
        assert_eq!(read_prd_file(&json_path), None);

        let yaml_path = temp.path().join("prd.yaml");
        fs::write(&yaml_path, "- category: [unclosed\n").expect("write");
        assert_eq!(read_prd_file(&yaml_path), None);

        assert_eq!(read_prd_file(&temp.path().join("missing.json")), None);
    }

    #[test]
    fn read_yaml_ignores_extension() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.json");
        fs::write(&path, "items:\n  - name: A\n").expect("write");
        assert_eq!(read_prd_file(&path), None);
        let file = read_yaml_prd_file(&path).expect("read yaml");
        assert_eq!(file.content, json!({"items": [{"name": "A"}]}));
    }

    #[test]
    fn load_prd_reports_validation_errors() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.json");
        fs::write(&path, r#"[{"category": "ui", "description": "x", "steps": []}]"#).expect("write");
        let err = load_prd(&path).expect_err("should fail");
        assert!(err.to_string().contains("Item 1: passes must be a boolean"));

        write_prd(&path, &sample_document()).expect("write");
        assert_eq!(load_prd(&path).expect("load"), sample_document());
    }

    #[test]
    fn document_prefers_yaml_when_both_exist() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = PrdPaths::new(temp.path());
        assert_eq!(paths.document(), None);

        write_prd(&paths.json_path, &[]).expect("write json");
        assert_eq!(paths.document(), Some(paths.json_path.clone()));

        write_prd(&paths.yaml_path, &[]).expect("write yaml");
        assert_eq!(paths.document(), Some(paths.yaml_path.clone()));
        assert_eq!(paths.default_document(DocumentFormat::Json), paths.json_path);
    }
}

//! Validate → recover → restore → bootstrap, for `prd fix`.
//!
//! Every path that rewrites the document first backs up the bytes currently on
//! disk, so nothing the agent wrote is ever lost without a copy.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::core::merge::{MergeOptions, MergeResult, smart_merge_with};
use crate::core::recovery::attempt_recovery;
use crate::core::template::create_template_prd;
use crate::core::validator::validate_prd;
use crate::entry::Entry;
use crate::io::backup::{create_backup, list_backups};
use crate::io::prd_store::{PrdFile, read_prd_file, write_prd};

/// What `repair_prd` did to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    /// Document already valid; nothing written.
    AlreadyValid { entries: Vec<Entry> },
    /// Malformed document rebuilt in place by [`attempt_recovery`].
    Recovered { entries: Vec<Entry>, backup: PathBuf },
    /// Last valid backup restored, with completion flags forwarded from the
    /// corrupted document.
    Restored {
        entries: Vec<Entry>,
        backup: Option<PathBuf>,
        restored_from: PathBuf,
        items_updated: usize,
        warnings: Vec<String>,
    },
    /// Bootstrap template installed for the agent to repair by hand.
    Bootstrapped { backup: Option<PathBuf> },
}

impl fmt::Display for RepairOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairOutcome::AlreadyValid { entries } => {
                write!(f, "valid ({} entries)", entries.len())
            }
            RepairOutcome::Recovered { entries, backup } => write!(
                f,
                "recovered {} entries (backup: {})",
                entries.len(),
                backup.display()
            ),
            RepairOutcome::Restored {
                entries,
                restored_from,
                items_updated,
                ..
            } => write!(
                f,
                "restored {} entries from {} ({} marked complete from corrupted copy)",
                entries.len(),
                restored_from.display(),
                items_updated
            ),
            RepairOutcome::Bootstrapped { backup: Some(backup) } => write!(
                f,
                "installed bootstrap template referencing {}",
                backup.display()
            ),
            RepairOutcome::Bootstrapped { backup: None } => {
                write!(f, "installed bootstrap template")
            }
        }
    }
}

/// Bring the document at `path` back to a valid state.
///
/// Read and parse failures are not errors here; they route to the restore and
/// bootstrap steps. Backup and write failures propagate.
pub fn repair_prd(path: &Path, options: &MergeOptions) -> Result<RepairOutcome> {
    let file = read_prd_file(path);

    if let Some(file) = &file {
        let validation = validate_prd(&file.content);
        if let Some(entries) = validation.data {
            debug!(path = %path.display(), entries = entries.len(), "document valid");
            return Ok(RepairOutcome::AlreadyValid { entries });
        }
        warn!(
            path = %path.display(),
            errors = validation.errors.len(),
            first = validation.errors.first().map(String::as_str).unwrap_or_default(),
            "document invalid"
        );

        if let Some(entries) = attempt_recovery(&file.content) {
            let backup = create_backup(path)?;
            write_prd(path, &entries)?;
            let outcome = RepairOutcome::Recovered { entries, backup };
            info!(path = %path.display(), %outcome, "repair finished");
            return Ok(outcome);
        }
    }

    // Look for a restorable backup before adding one of the corrupted bytes.
    let restorable = latest_valid_backup(path);
    let backup = if path.exists() {
        Some(create_backup(path)?)
    } else {
        None
    };

    let outcome = match restorable {
        Some((restored_from, baseline)) => {
            let merge = forward_completion(&baseline, file.as_ref(), options);
            for warning in &merge.warnings {
                warn!(%warning, "completion not forwarded");
            }
            write_prd(path, &merge.merged)?;
            RepairOutcome::Restored {
                entries: merge.merged,
                backup,
                restored_from,
                items_updated: merge.items_updated,
                warnings: merge.warnings,
            }
        }
        None => {
            write_prd(path, &create_template_prd(backup.as_deref())?)?;
            RepairOutcome::Bootstrapped { backup }
        }
    };
    info!(path = %path.display(), %outcome, "repair finished");
    Ok(outcome)
}

/// Newest backup next to `path` that parses and validates.
fn latest_valid_backup(path: &Path) -> Option<(PathBuf, Vec<Entry>)> {
    list_backups(path).into_iter().find_map(|candidate| {
        let entries = read_prd_file(&candidate).and_then(|file| validate_prd(&file.content).data);
        if entries.is_none() {
            debug!(backup = %candidate.display(), "skipping invalid backup");
        }
        entries.map(|entries| (candidate, entries))
    })
}

fn forward_completion(
    baseline: &[Entry],
    corrupted: Option<&PrdFile>,
    options: &MergeOptions,
) -> MergeResult {
    match corrupted {
        Some(file) => smart_merge_with(baseline, &file.content, options),
        None => MergeResult {
            merged: baseline.to_vec(),
            items_updated: 0,
            warnings: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Category;
    use crate::io::backup::find_latest_backup;
    use crate::io::prd_store::load_prd;
    use crate::test_support::sample_document;
    use std::fs;

    #[test]
    fn valid_document_is_left_alone() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.json");
        write_prd(&path, &sample_document()).expect("write");
        let before = fs::read_to_string(&path).expect("read");

        let outcome = repair_prd(&path, &MergeOptions::default()).expect("repair");
        assert_eq!(
            outcome,
            RepairOutcome::AlreadyValid {
                entries: sample_document()
            }
        );
        assert_eq!(fs::read_to_string(&path).expect("read"), before);
        assert_eq!(find_latest_backup(&path), None);
    }

    #[test]
    fn recoverable_document_is_rewritten_with_backup() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.json");
        let corrupted = r#"{"tasks":[{"title":"A","type":"bugfix","done":true}]}"#;
        fs::write(&path, corrupted).expect("write");

        let outcome = repair_prd(&path, &MergeOptions::default()).expect("repair");
        let (entries, backup) = match outcome {
            RepairOutcome::Recovered { entries, backup } => (entries, backup),
            other => panic!("expected recovery, got {other:?}"),
        };
        assert_eq!(entries[0].category, Category::Bugfix);
        assert_eq!(load_prd(&path).expect("load"), entries);
        assert_eq!(fs::read_to_string(&backup).expect("read backup"), corrupted);
    }

    #[test]
    fn unparseable_document_without_backups_is_bootstrapped() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.json");
        fs::write(&path, "[{ broken").expect("write");

        let outcome = repair_prd(&path, &MergeOptions::default()).expect("repair");
        let backup = match outcome {
            RepairOutcome::Bootstrapped {
                backup: Some(backup),
            } => backup,
            other => panic!("expected bootstrap, got {other:?}"),
        };
        let entries = load_prd(&path).expect("template is valid");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, Category::Setup);
        assert!(entries[0].steps[0].contains(&format!("@{{{}}}", backup.display())));
    }

    #[test]
    fn invalid_newest_backup_is_skipped_for_older_valid_one() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.json");
        let older = temp.path().join("backup.prd.2020-01-01T00-00-00-000Z.json");
        let newer = temp.path().join("backup.prd.2021-01-01T00-00-00-000Z.json");
        write_prd(&older, &sample_document()).expect("write older");
        fs::write(&newer, "[{ broken").expect("write newer");
        fs::write(&path, "[{ still broken").expect("write");

        let outcome = repair_prd(&path, &MergeOptions::default()).expect("repair");
        let (entries, restored_from) = match outcome {
            RepairOutcome::Restored {
                entries,
                restored_from,
                ..
            } => (entries, restored_from),
            other => panic!("expected restore, got {other:?}"),
        };
        assert_eq!(restored_from, older);
        assert_eq!(entries, sample_document());
        assert_eq!(load_prd(&path).expect("load"), sample_document());
    }

    #[test]
    fn missing_document_is_bootstrapped_without_backup() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("prd.json");
        let outcome = repair_prd(&path, &MergeOptions::default()).expect("repair");
        assert_eq!(outcome, RepairOutcome::Bootstrapped { backup: None });
        assert!(load_prd(&path).is_ok());
    }
}

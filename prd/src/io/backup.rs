//! Timestamped sibling backups of the on-disk document.
//!
//! Backups are named `backup.prd.<timestamp><ext>` next to the source. The
//! timestamp is RFC 3339 in UTC with `:` and `.` replaced by `-`, so a plain
//! descending sort of file names puts the newest backup first.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use tracing::{debug, info};

use super::prd_store::DocumentFormat;

const BACKUP_PREFIX: &str = "backup.prd.";
const BACKUP_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml"];

/// Copy the current bytes of `path` to a new timestamped sibling.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    create_backup_at(path, Utc::now())
}

/// [`create_backup`] with an explicit timestamp.
///
/// An existing backup is never overwritten: the timestamp advances one
/// millisecond at a time until the name is free.
pub fn create_backup_at(path: &Path, at: DateTime<Utc>) -> Result<PathBuf> {
    let bytes = fs::read(path).with_context(|| format!("read {} for backup", path.display()))?;
    let dir = sibling_dir(path);
    let mut stamp = at;
    let mut backup_path = dir.join(backup_file_name(path, stamp));
    while backup_path.exists() {
        stamp += TimeDelta::milliseconds(1);
        backup_path = dir.join(backup_file_name(path, stamp));
    }
    fs::write(&backup_path, bytes)
        .with_context(|| format!("write backup {}", backup_path.display()))?;
    info!(source = %path.display(), backup = %backup_path.display(), "backup created");
    Ok(backup_path)
}

/// File name for a backup of `source` taken at `at`.
pub fn backup_file_name(source: &Path, at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{BACKUP_PREFIX}{stamp}{}", backup_extension(source))
}

fn backup_extension(source: &Path) -> &'static str {
    match DocumentFormat::from_path(source) {
        DocumentFormat::Yaml if source.extension().is_some_and(|ext| ext == "yml") => ".yml",
        DocumentFormat::Yaml => ".yaml",
        DocumentFormat::Json => ".json",
    }
}

/// True for names following the backup naming convention.
pub fn is_backup_file_name(name: &str) -> bool {
    name.strip_prefix(BACKUP_PREFIX).is_some_and(|rest| {
        BACKUP_EXTENSIONS
            .iter()
            .any(|ext| rest.len() > ext.len() && rest.ends_with(ext))
    })
}

/// Every backup next to `path`, newest first.
///
/// A missing directory yields an empty list.
pub fn list_backups(path: &Path) -> Vec<PathBuf> {
    let dir = sibling_dir(path);
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "backup directory unreadable");
            return Vec::new();
        }
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_backup_file_name(name))
        .collect();
    names.sort_unstable_by(|a, b| b.cmp(a));
    names.into_iter().map(|name| dir.join(name)).collect()
}

/// Most recent backup next to `path`, if any.
pub fn find_latest_backup(path: &Path) -> Option<PathBuf> {
    list_backups(path).into_iter().next()
}

fn sibling_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64, millis: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, millis * 1_000_000)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn file_name_sanitizes_timestamp() {
        let stamp = at(1_705_314_645, 123);
        assert_eq!(
            backup_file_name(Path::new("prd.json"), stamp),
            "backup.prd.2024-01-15T10-30-45-123Z.json"
        );
        assert_eq!(
            backup_file_name(Path::new("prd.yml"), stamp),
            "backup.prd.2024-01-15T10-30-45-123Z.yml"
        );
        assert_eq!(
            backup_file_name(Path::new("prd.yaml"), stamp),
            "backup.prd.2024-01-15T10-30-45-123Z.yaml"
        );
        assert_eq!(
            backup_file_name(Path::new("prd.txt"), stamp),
            "backup.prd.2024-01-15T10-30-45-123Z.json"
        );
    }

    #[test]
    fn backup_copies_bytes_and_leaves_source_untouched() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("prd.json");
        fs::write(&source, "{ not valid json").expect("write");

        let backup = create_backup(&source).expect("backup");
        assert_eq!(backup.parent(), Some(temp.path()));
        assert_eq!(fs::read_to_string(&backup).expect("read backup"), "{ not valid json");
        assert_eq!(fs::read_to_string(&source).expect("read source"), "{ not valid json");
    }

    #[test]
    fn backup_of_missing_source_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = create_backup(&temp.path().join("prd.json")).expect_err("should fail");
        assert!(err.to_string().contains("for backup"));
    }

    /// Backups taken later always sort first.
    #[test]
    fn latest_backup_is_most_recent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("prd.json");
        fs::write(&source, "[]").expect("write");

        let mut created = Vec::new();
        for (secs, millis) in [(1_700_000_000, 5), (1_700_000_000, 900), (1_700_000_009, 0)] {
            created.push(create_backup_at(&source, at(secs, millis)).expect("backup"));
        }

        assert_eq!(find_latest_backup(&source), created.last().cloned());
        let listed = list_backups(&source);
        created.reverse();
        assert_eq!(listed, created);
    }

    #[test]
    fn same_millisecond_backups_do_not_collide() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("prd.yaml");
        fs::write(&source, "first").expect("write");
        let first = create_backup_at(&source, at(1_705_314_645, 123)).expect("first");
        fs::write(&source, "second").expect("write");
        let second = create_backup_at(&source, at(1_705_314_645, 123)).expect("second");

        assert_ne!(first, second);
        assert!(second.ends_with("backup.prd.2024-01-15T10-30-45-124Z.yaml"));
        assert_eq!(find_latest_backup(&source), Some(second));
        assert_eq!(fs::read_to_string(&first).expect("read"), "first");
    }

    #[test]
    fn ignores_unrelated_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("prd.json");
        for name in ["prd.json", "backup.prd.json", "backup.prd.2024.txt", "notes.json"] {
            fs::write(temp.path().join(name), "[]").expect("write");
        }
        assert_eq!(find_latest_backup(&source), None);

        fs::write(temp.path().join("backup.prd.2024-01-01T00-00-00-000Z.yaml"), "[]").expect("write");
        assert_eq!(
            find_latest_backup(&source),
            Some(temp.path().join("backup.prd.2024-01-01T00-00-00-000Z.yaml"))
        );
    }

    #[test]
    fn missing_directory_has_no_backups() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert_eq!(find_latest_backup(&temp.path().join("absent/prd.json")), None);
    }
}

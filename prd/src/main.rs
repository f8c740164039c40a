//! Requirements document maintenance for unattended agent loops.
//!
//! Operates on `.prd/prd.yaml` / `.prd/prd.json` under a project root. Every
//! command prints its result to stdout and reports through the exit code.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use prd::core::merge::smart_merge_with;
use prd::core::summary::summarize;
use prd::core::template::create_template_prd;
use prd::core::validator::validate_prd;
use prd::entry::Entry;
use prd::exit_codes;
use prd::io::backup::{create_backup, find_latest_backup};
use prd::io::config::{PrdConfig, load_config};
use prd::io::prd_store::{PrdPaths, load_prd, read_prd_file, read_yaml_prd_file, write_prd};
use prd::io::references::expand_prd_file_references;
use prd::logging;
use prd::repair::{RepairOutcome, repair_prd};

#[derive(Parser)]
#[command(
    name = "prd",
    version,
    about = "Validate, repair, and merge agent-maintained requirements documents"
)]
struct Cli {
    /// Project root containing `.prd/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Log core decisions (recovery rejections, skipped backups) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the document and list every schema error.
    Validate,
    /// Show passing/total counts per category.
    Status,
    /// Repair the document: recover, restore a backup, or install the bootstrap template.
    Fix,
    /// Forward completion flags from a corrupted copy into the current document.
    Merge {
        /// Corrupted document (JSON or YAML, any shape).
        corrupted: PathBuf,
    },
    /// Copy the current document to a timestamped backup.
    Backup,
    /// Print the most recent backup path.
    LatestBackup,
    /// Print the bootstrap document as JSON.
    Template {
        /// Backup to reference from the bootstrap step.
        #[arg(long)]
        backup: Option<PathBuf>,
    },
    /// Print the document with `@{path}` references expanded.
    Expand,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let paths = PrdPaths::new(&cli.root);
    let config = load_config(&paths.config_path)?;
    match cli.command {
        Command::Validate => cmd_validate(&paths),
        Command::Status => cmd_status(&paths),
        Command::Fix => cmd_fix(&paths, &config),
        Command::Merge { corrupted } => cmd_merge(&paths, &config, &corrupted),
        Command::Backup => cmd_backup(&paths),
        Command::LatestBackup => cmd_latest_backup(&paths, &config),
        Command::Template { backup } => cmd_template(backup.as_deref()),
        Command::Expand => cmd_expand(&paths),
    }
}

fn cmd_validate(paths: &PrdPaths) -> Result<i32> {
    let path = existing_document(paths)?;
    let Some(file) = read_prd_file(&path) else {
        println!("{}: unreadable or malformed", path.display());
        return Ok(exit_codes::INVALID);
    };
    let result = validate_prd(&file.content);
    match result.data {
        Some(entries) => {
            println!("ok ({} entries)", entries.len());
            Ok(exit_codes::OK)
        }
        None => {
            for error in &result.errors {
                println!("{error}");
            }
            Ok(exit_codes::INVALID)
        }
    }
}

fn cmd_status(paths: &PrdPaths) -> Result<i32> {
    let entries = load_prd(&existing_document(paths)?)?;
    let summary = summarize(&entries);
    for (category, count) in &summary.by_category {
        println!("{:<12} {}/{}", category, count.passing, count.total);
    }
    println!("{:<12} {}/{}", "total", summary.passing, summary.total);
    Ok(exit_codes::OK)
}

fn cmd_fix(paths: &PrdPaths, config: &PrdConfig) -> Result<i32> {
    let path = paths
        .document()
        .unwrap_or_else(|| paths.default_document(config.format));
    let outcome = repair_prd(&path, &config.merge_options())?;
    println!("{outcome}");
    match outcome {
        RepairOutcome::Restored { warnings, .. } => {
            print_warnings(&warnings);
            Ok(exit_codes::OK)
        }
        RepairOutcome::Bootstrapped { .. } => Ok(exit_codes::BOOTSTRAPPED),
        RepairOutcome::AlreadyValid { .. } | RepairOutcome::Recovered { .. } => Ok(exit_codes::OK),
    }
}

fn cmd_merge(paths: &PrdPaths, config: &PrdConfig, corrupted: &Path) -> Result<i32> {
    let path = existing_document(paths)?;
    let baseline = load_prd(&path)?;
    // YAML is a superset of JSON, so it is the lenient fallback for any shape.
    let corrupted_file = read_prd_file(corrupted)
        .or_else(|| read_yaml_prd_file(corrupted))
        .ok_or_else(|| anyhow!("read or parse corrupted document {}", corrupted.display()))?;

    let result = smart_merge_with(&baseline, &corrupted_file.content, &config.merge_options());
    write_prd(&path, &result.merged)?;
    println!("updated {}", result.items_updated);
    print_warnings(&result.warnings);
    Ok(exit_codes::OK)
}

fn cmd_backup(paths: &PrdPaths) -> Result<i32> {
    let backup = create_backup(&existing_document(paths)?)?;
    println!("{}", backup.display());
    Ok(exit_codes::OK)
}

fn cmd_latest_backup(paths: &PrdPaths, config: &PrdConfig) -> Result<i32> {
    let path = paths
        .document()
        .unwrap_or_else(|| paths.default_document(config.format));
    match find_latest_backup(&path) {
        Some(backup) => {
            println!("{}", backup.display());
            Ok(exit_codes::OK)
        }
        None => {
            println!("no backups in {}", paths.prd_dir.display());
            Ok(exit_codes::INVALID)
        }
    }
}

fn cmd_template(backup: Option<&Path>) -> Result<i32> {
    print_json(&create_template_prd(backup)?)?;
    Ok(exit_codes::OK)
}

fn cmd_expand(paths: &PrdPaths) -> Result<i32> {
    let path = existing_document(paths)?;
    let entries = load_prd(&path)?;
    let expanded = expand_prd_file_references(&entries, &paths.prd_dir);
    print_json(&expanded)?;
    Ok(exit_codes::OK)
}

fn existing_document(paths: &PrdPaths) -> Result<PathBuf> {
    paths
        .document()
        .with_context(|| format!("no prd.yaml, prd.yml, or prd.json in {}", paths.prd_dir.display()))
}

fn print_json(entries: &[Entry]) -> Result<()> {
    let payload = serde_json::to_string_pretty(entries).context("serialize json")?;
    println!("{payload}");
    Ok(())
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("warning: {warning}");
    }
}

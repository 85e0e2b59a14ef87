//! Command-line adapter.
//!
//! The CLI is thin by design: it parses arguments, loads the optional rules
//! file, wires the append-only log sink into an [`Organizer`], runs one
//! organize pass, and reports the outcome. Fatal errors surface as a single
//! failure message; per-file failures are visible in the summary and the
//! event log.

use crate::classifier::{CategoryRule, CategoryTable};
use crate::config::RulesConfig;
use crate::events::LogFileSink;
use crate::organizer::{OrganizeError, Organizer, RESERVED_LOG_FILE};
use crate::output::OutputFormatter;
use clap::Parser;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Sort a directory's files into category subfolders by extension.
#[derive(Parser, Debug)]
#[command(name = "sortbox", version, about)]
pub struct Cli {
    /// Directory whose files will be sorted.
    pub directory: PathBuf,

    /// TOML file with custom category rules.
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// List the planned moves without touching any file.
    #[arg(long)]
    pub dry_run: bool,
}

/// Runs one CLI invocation.
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    let config = RulesConfig::load(cli.rules.as_deref())
        .map_err(|e| format!("Error loading rules: {e}"))?;
    let custom = config.into_rules();

    if cli.dry_run {
        preview_directory(&cli.directory, custom)
    } else {
        organize_directory(&cli.directory, custom)
    }
}

fn organize_directory(dir: &Path, custom: Vec<CategoryRule>) -> Result<(), String> {
    // Validate before opening the log sink inside the directory, so a bad
    // path reports as what it is instead of a log-file error.
    if !dir.is_dir() {
        return Err(OrganizeError::InvalidDirectory {
            path: dir.to_path_buf(),
        }
        .to_string());
    }

    OutputFormatter::info(&format!("Organizing contents of: {}", dir.display()));

    let log_path = dir.join(RESERVED_LOG_FILE);
    let sink =
        LogFileSink::open(&log_path).map_err(|e| format!("Error opening event log: {e}"))?;

    let mut organizer = Organizer::new(Box::new(sink));
    let custom = (!custom.is_empty()).then_some(custom);
    let report = organizer
        .organize(dir, custom)
        .map_err(|e| e.to_string())?;

    if !report.failed_moves.is_empty() {
        OutputFormatter::warning(&format!(
            "{} file(s) could not be moved:",
            report.failed_moves.len()
        ));
        for (path, reason) in &report.failed_moves {
            OutputFormatter::error(&format!("  {}: {}", path.display(), reason));
        }
    }

    OutputFormatter::summary_table(&report.category_counts, report.moved);
    OutputFormatter::success("Organization complete!");
    OutputFormatter::plain(&format!("Events were appended to {}", log_path.display()));

    Ok(())
}

/// Classifies every candidate entry and prints where it would go, without
/// moving anything.
fn preview_directory(dir: &Path, custom: Vec<CategoryRule>) -> Result<(), String> {
    if !dir.is_dir() {
        return Err(OrganizeError::InvalidDirectory {
            path: dir.to_path_buf(),
        }
        .to_string());
    }

    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", dir.display()));

    let mut table = CategoryTable::default();
    table.merge_rules(custom);

    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(|e| format!("Error reading directory {}: {e}", dir.display()))?
        .flatten()
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name != RESERVED_LOG_FILE)
        .collect();
    names.sort();

    if names.is_empty() {
        OutputFormatter::plain("No files to organize.");
        return Ok(());
    }

    let mut category_counts: HashMap<String, usize> = HashMap::new();
    for name in &names {
        let category = table.categorize(name);
        OutputFormatter::plain(&format!(" - {name} → {category}/"));
        *category_counts.entry(category.to_string()).or_insert(0) += 1;
    }

    OutputFormatter::summary_table(&category_counts, names.len());
    OutputFormatter::success("Dry run complete. No files were moved.");

    Ok(())
}

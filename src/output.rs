//! Terminal output for the CLI adapter.
//!
//! All user-facing printing goes through here so styling stays in one
//! place. The core never prints; it emits events to its sink instead.

use colored::*;
use std::collections::HashMap;

/// Consistent styling for CLI messages and summaries.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Green checkmark line.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Red cross line, to stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Yellow warning line.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Cyan informational line.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Unstyled line.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Yellow dry-run banner line.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Per-category counts followed by a total.
    pub fn summary_table(category_counts: &HashMap<String, usize>, total_files: usize) {
        println!("\n{}", "SUMMARY".bold());

        let mut categories: Vec<_> = category_counts.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let width = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("Total".len());

        for (category, count) in &categories {
            let noun = if **count == 1 { "file" } else { "files" };
            println!(
                "  {:<width$}  {} {}",
                category,
                count.to_string().green(),
                noun,
            );
        }
        let noun = if total_files == 1 { "file" } else { "files" };
        println!(
            "  {:<width$}  {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            noun,
        );
    }
}

//! Output formatting and styling module.
//!
//! Centralizes all console output: colored status messages, the scanning
//! spinner, and the record/statistics tables the menu flows print.

use crate::catalog::{FIELD_CALORIES, Record};
use crate::stats::UNCLASSIFIED;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::time::Duration;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a spinner shown while the catalog tree is being scanned.
    pub fn scan_spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid spinner template"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    /// Prints records as a table with their calorie value and storage
    /// location.
    pub fn record_table(records: &[&Record]) {
        let name_width = records
            .iter()
            .map(|r| r.name().len())
            .max()
            .unwrap_or(0)
            .max(4);

        println!(
            "{:<name_width$} | {:>10} | {}",
            "Name".bold(),
            "kcal/100g".bold(),
            "Location".bold(),
        );
        println!("{}", "-".repeat(name_width + 30));

        for record in records {
            println!(
                "{:<name_width$} | {:>10} | {}",
                record.name(),
                record.get(FIELD_CALORIES).unwrap_or("-"),
                Self::location(record),
            );
        }
    }

    /// Prints candidate records with a 1-based index, for the
    /// disambiguation prompt.
    pub fn candidate_table(records: &[&Record]) {
        for (index, record) in records.iter().enumerate() {
            println!(
                " {}) {} [{} kcal/100g] in {}",
                (index + 1).to_string().bold(),
                record.name(),
                record.get(FIELD_CALORIES).unwrap_or("-"),
                Self::location(record),
            );
        }
    }

    /// Prints the per-category record counts with a total footer.
    pub fn category_table(counts: &BTreeMap<String, usize>, total: usize) {
        let category_width = counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<category_width$} | {}",
            "Category".bold(),
            "Items".bold(),
        );
        println!("{}", "-".repeat(category_width + 10));

        for (category, count) in counts {
            let item_word = if *count == 1 { "item" } else { "items" };
            println!(
                "{:<category_width$} | {} {}",
                category,
                count.to_string().green(),
                item_word,
            );
        }

        println!("{}", "-".repeat(category_width + 10));
        println!(
            "{:<category_width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            if total == 1 { "item" } else { "items" },
        );
    }

    fn location(record: &Record) -> String {
        record
            .hierarchy()
            .map(|h| h.to_string())
            .unwrap_or_else(|| UNCLASSIFIED.to_string())
    }
}

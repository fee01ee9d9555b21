//! Markdown run report generation
//!
//! This module renders a [`CrawlReport`] as a human-readable markdown file,
//! including stage counters and the skipped categories and items.

use crate::output::report::CrawlReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown form of a run report
///
/// # Arguments
///
/// * `report` - The run report
/// * `config_hash` - Hash of the configuration the run used
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(std::io::Error)` - Failed to write the file
pub fn write_markdown_report(
    report: &CrawlReport,
    config_hash: &str,
    output_path: &Path,
) -> std::io::Result<()> {
    let markdown = format_markdown_report(report, config_hash);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_report(report: &CrawlReport, config_hash: &str) -> String {
    let mut md = String::new();

    md.push_str("# Shelfscan Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = &report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    md.push_str(&format!("- **Stage Reached**: {}\n", report.stage));
    md.push_str(&format!(
        "- **Root Reachable**: {}\n",
        if report.root_reachable { "yes" } else { "no" }
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", config_hash));

    // Counters
    md.push_str("## Statistics\n\n");
    md.push_str("| Measure | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!(
        "| Categories discovered | {} |\n",
        report.categories_discovered
    ));
    md.push_str(&format!(
        "| Categories collected | {} |\n",
        report.categories_collected
    ));
    md.push_str(&format!(
        "| Categories failed | {} |\n",
        report.category_failures.len()
    ));
    md.push_str(&format!("| Items listed | {} |\n", report.items_listed));
    md.push_str(&format!(
        "| Records harvested | {} |\n",
        report.records_harvested
    ));
    md.push_str(&format!(
        "| Items skipped | {} |\n\n",
        report.skipped_items.len()
    ));
    md.push_str(&format!(
        "Harvest rate: {:.2}%\n\n",
        report.harvest_rate()
    ));

    if !report.category_failures.is_empty() {
        md.push_str("## Failed Categories\n\n");
        md.push_str("| Category | URL | Reason |\n");
        md.push_str("|----------|-----|--------|\n");
        for failure in &report.category_failures {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                failure.name, failure.url, failure.reason
            ));
        }
        md.push('\n');
    }

    if !report.skipped_items.is_empty() {
        md.push_str("## Skipped Items\n\n");
        md.push_str("| Category | URL | Reason |\n");
        md.push_str("|----------|-----|--------|\n");
        for skip in report.skipped_items.iter().take(50) {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                skip.category, skip.url, skip.reason
            ));
        }
        if report.skipped_items.len() > 50 {
            md.push_str(&format!(
                "\n... and {} more\n",
                report.skipped_items.len() - 50
            ));
        }
        md.push('\n');
    }

    if !report.batch_errors.is_empty() {
        md.push_str("## Stage Errors\n\n");
        for error in &report.batch_errors {
            md.push_str(&format!("- {}\n", error));
        }
        md.push('\n');
    }

    md
}

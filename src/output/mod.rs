//! Output module for run reports
//!
//! This module handles:
//! - Accumulating per-run counters and skip lists
//! - Printing the run report to stdout
//! - Writing the run report as markdown

mod markdown;
mod report;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use report::{print_report, CategoryFailure, CrawlReport, SkippedItem};

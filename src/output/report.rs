//! Run report accumulated by the pipeline
//!
//! This module holds the per-run counters and skip lists, and prints them
//! to stdout once a run ends.

use crate::crawler::{HarvestBatch, ListingBatch};
use crate::state::PipelineStage;
use chrono::{DateTime, Utc};

/// A category that produced no listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFailure {
    pub name: String,
    pub url: String,
    pub reason: String,
}

/// An item that produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub url: String,
    pub category: String,
    pub reason: String,
}

/// Summary of one pipeline run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Stage the run ended in
    pub stage: PipelineStage,

    /// Whether the liveness probe saw a 200
    pub root_reachable: bool,

    pub categories_discovered: usize,
    pub categories_collected: usize,
    pub category_failures: Vec<CategoryFailure>,

    /// Stage-level failures that were logged instead of aborting the run
    pub batch_errors: Vec<String>,

    pub items_listed: usize,
    pub records_harvested: usize,
    pub skipped_items: Vec<SkippedItem>,
}

impl CrawlReport {
    /// Starts a report timed from now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            stage: PipelineStage::Init,
            root_reachable: false,
            categories_discovered: 0,
            categories_collected: 0,
            category_failures: Vec::new(),
            batch_errors: Vec::new(),
            items_listed: 0,
            records_harvested: 0,
            skipped_items: Vec::new(),
        }
    }

    /// Copies the outcome of the listing stage
    pub fn record_listing(&mut self, batch: &ListingBatch) {
        self.categories_collected = batch.listings.len();
        self.items_listed = batch.item_count();
        self.category_failures = batch
            .failures
            .iter()
            .map(|failure| CategoryFailure {
                name: failure.category.name.clone(),
                url: failure.category.url.clone(),
                reason: failure.error.to_string(),
            })
            .collect();
    }

    /// Copies the outcome of the harvest stage
    pub fn record_harvest(&mut self, batch: &HarvestBatch) {
        self.records_harvested = batch.records.len();
        self.skipped_items = batch
            .skipped
            .iter()
            .map(|skip| SkippedItem {
                url: skip.url.clone(),
                category: skip.category.clone(),
                reason: skip.error.to_string(),
            })
            .collect();
    }

    /// Stamps the finish time and final stage
    pub fn finish(&mut self, stage: PipelineStage) {
        self.stage = stage;
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<u64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds().max(0) as u64)
    }

    /// Share of listed items that became records, as a percentage
    pub fn harvest_rate(&self) -> f64 {
        if self.items_listed == 0 {
            0.0
        } else {
            (self.records_harvested as f64 / self.items_listed as f64) * 100.0
        }
    }
}

impl Default for CrawlReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints a run report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Run:");
    println!("  Stage reached: {}", report.stage);
    println!(
        "  Started: {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(duration) = report.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!(
        "  Root reachable: {}",
        if report.root_reachable { "yes" } else { "no" }
    );
    println!();

    println!("Categories:");
    println!("  Discovered: {}", report.categories_discovered);
    println!("  Collected: {}", report.categories_collected);
    println!("  Failed: {}", report.category_failures.len());
    for failure in &report.category_failures {
        println!("    {} ({}): {}", failure.name, failure.url, failure.reason);
    }
    println!();

    println!("Items:");
    println!("  Listed: {}", report.items_listed);
    println!(
        "  Harvested: {} ({:.1}%)",
        report.records_harvested,
        report.harvest_rate()
    );
    println!("  Skipped: {}", report.skipped_items.len());
    for skip in report.skipped_items.iter().take(20) {
        println!("    [{}] {}: {}", skip.category, skip.url, skip.reason);
    }
    if report.skipped_items.len() > 20 {
        println!("    ... and {} more", report.skipped_items.len() - 20);
    }

    if !report.batch_errors.is_empty() {
        println!();
        println!("Stage errors:");
        for error in &report.batch_errors {
            println!("  {}", error);
        }
    }
}

//! Crawler module for page fetching and record extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with per-call timeouts
//! - Declarative CSS extraction schemas
//! - Category discovery, listing collection and item harvesting
//! - Overall pipeline orchestration

mod context;
mod discover;
mod extract;
mod fetcher;
mod harvest;
mod listing;
mod pipeline;
mod schema;

pub use context::{RunContext, Timeouts};
pub use discover::{discover_categories, parse_categories};
pub use extract::{extract, extract_html, Extraction, Schema, Selection};
pub use fetcher::{
    build_http_client, check_liveness, fetch, user_agent_string, FetchError, FetchedPage,
};
pub use harvest::{harvest_item, harvest_items, parse_item, HarvestBatch, ItemSkip};
pub use listing::{collect_listings, parse_listing, ListingBatch, ListingError, ListingFailure};
pub use pipeline::Pipeline;
pub use schema::Schemas;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::storage::RecordSink;
use crate::ShelfError;

/// Runs a complete crawl and hands the records to `sink`
///
/// This is the main entry point for a crawl. It will:
/// 1. Probe the site root
/// 2. Discover categories from the navigation
/// 3. Collect every category listing concurrently
/// 4. Harvest the item detail pages
/// 5. Deliver the records to the sink
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `sink` - Destination for the harvested records
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl reached `Done`
/// * `Err(ShelfError)` - Crawl failed
pub async fn crawl(config: &Config, sink: &mut dyn RecordSink) -> Result<CrawlReport, ShelfError> {
    let mut pipeline = Pipeline::new(config)?;
    pipeline.run(sink).await
}

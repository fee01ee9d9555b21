//! Per-run crawl context
//!
//! Everything a stage needs besides the HTTP client: site URLs, timeouts,
//! concurrency caps and compiled schemas. Built once from a validated
//! [`Config`] and shared read-only by every stage.

use crate::config::Config;
use crate::crawler::schema::Schemas;
use crate::url::catalogue_url;
use crate::ShelfError;
use std::time::Duration;
use url::Url;

/// Timeout regimes used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub liveness: Duration,
    pub discovery: Duration,
    pub listing: Duration,
    pub detail: Duration,
}

/// Read-only context shared by every stage of one run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Site root, always ending in `/`
    pub base_url: Url,

    /// `<base>catalogue/`, the root listing hrefs are rewritten onto
    pub catalogue_url: Url,

    /// Navigation href dropped during discovery
    pub excluded_category: String,

    pub timeouts: Timeouts,

    /// Cap on simultaneous category fetches, None for unbounded
    pub max_concurrent_listings: Option<usize>,

    /// Detail pages fetched at once (1 = sequential)
    pub max_concurrent_details: usize,

    pub schemas: Schemas,
}

impl RunContext {
    /// Builds the context from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self, ShelfError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let catalogue_url = catalogue_url(&base_url)?;
        let fetch = &config.fetch;

        Ok(Self {
            base_url,
            catalogue_url,
            excluded_category: config.site.excluded_category.clone(),
            timeouts: Timeouts {
                liveness: Duration::from_millis(fetch.liveness_timeout_ms),
                discovery: Duration::from_millis(fetch.discovery_timeout_ms),
                listing: Duration::from_millis(fetch.listing_timeout_ms),
                detail: Duration::from_millis(fetch.detail_timeout_ms),
            },
            max_concurrent_listings: fetch.max_concurrent_listings.map(|n| n as usize),
            max_concurrent_details: fetch.max_concurrent_details.max(1) as usize,
            schemas: Schemas::compile()?,
        })
    }
}

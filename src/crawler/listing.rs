//! Concurrent listing collection
//!
//! Every category page is fetched in its own task over the shared client.
//! The batch is awaited as a whole before any page is parsed; each task
//! returns its own outcome, so a failed category never touches a sibling's
//! result.

use crate::crawler::context::RunContext;
use crate::crawler::extract::extract_html;
use crate::crawler::fetcher::{fetch, FetchError, FetchedPage};
use crate::crawler::schema::{ITEM_HREF, LISTING};
use crate::model::{Category, ListingResult};
use crate::state::PipelineStage;
use crate::url::rewrite_listing_href;
use crate::ShelfError;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use url::Url;

/// Why a category produced no listing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("empty response body")]
    EmptyBody,

    #[error("listing container not found")]
    MissingContainer,
}

/// A category whose listing could not be collected
#[derive(Debug, Clone)]
pub struct ListingFailure {
    pub category: Category,
    pub error: ListingError,
}

/// Outcome of one listing stage
#[derive(Debug, Clone, Default)]
pub struct ListingBatch {
    /// Collected listings, in category order
    pub listings: Vec<ListingResult>,

    /// Categories left out of `listings`
    pub failures: Vec<ListingFailure>,
}

impl ListingBatch {
    /// Total number of item URLs across all listings
    pub fn item_count(&self) -> usize {
        self.listings.iter().map(|l| l.item_urls.len()).sum()
    }
}

/// Fetches every category page concurrently, then extracts item URLs
///
/// In-flight fetches are bounded by `max_concurrent_listings` when set.
///
/// # Errors
///
/// `ShelfError::StageBatch` if a fetch task panics or is cancelled. Per-category
/// failures are reported in [`ListingBatch::failures`] instead.
pub async fn collect_listings(
    client: &Client,
    context: &RunContext,
    categories: &[Category],
) -> Result<ListingBatch, ShelfError> {
    let limit = context
        .max_concurrent_listings
        .unwrap_or(categories.len())
        .max(1);
    let semaphore = Arc::new(Semaphore::new(limit));
    let timeout = context.timeouts.listing;

    tracing::info!(
        "Fetching {} category pages (limit {})",
        categories.len(),
        limit
    );

    let handles = categories.iter().cloned().map(|category| {
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let outcome = fetch_category(&client, &category, timeout).await;
            (category, outcome)
        })
    });

    let mut fetched = Vec::with_capacity(categories.len());
    for joined in join_all(handles).await {
        match joined {
            Ok(pair) => fetched.push(pair),
            Err(e) => {
                return Err(ShelfError::StageBatch {
                    stage: PipelineStage::Collect,
                    message: format!("category fetch task failed: {}", e),
                })
            }
        }
    }

    let mut batch = ListingBatch::default();
    for (category, outcome) in fetched {
        let parsed = outcome.and_then(|page| parse_listing(&category, &page.body, context));
        match parsed {
            Ok(listing) => batch.listings.push(listing),
            Err(error) => {
                match &error {
                    ListingError::EmptyBody => {
                        tracing::warn!("[WARN] Empty response for category {}", category.name)
                    }
                    ListingError::MissingContainer => tracing::error!(
                        "[ERROR] No listing found for category {} at {}",
                        category.name,
                        category.url
                    ),
                    // Already logged by the fetch task
                    ListingError::Fetch(_) => {}
                }
                batch.failures.push(ListingFailure { category, error });
            }
        }
    }

    tracing::info!(
        "Collected {} listings ({} items), {} categories failed",
        batch.listings.len(),
        batch.item_count(),
        batch.failures.len()
    );

    Ok(batch)
}

async fn fetch_category(
    client: &Client,
    category: &Category,
    timeout: std::time::Duration,
) -> Result<FetchedPage, ListingError> {
    match fetch(client, &category.url, timeout).await {
        Ok(page) if page.is_blank() => Err(ListingError::EmptyBody),
        Ok(page) => {
            tracing::info!("[SUCCESS] Category fetched: {}", category.url);
            Ok(page)
        }
        Err(e) => {
            match &e {
                FetchError::HttpError(status) => {
                    tracing::error!("[ERROR] {} responded with status {}", category.url, status)
                }
                FetchError::Unreachable(reason) => {
                    tracing::error!("[ERROR] Fetch failed for {} - {}", category.url, reason)
                }
            }
            Err(e.into())
        }
    }
}

/// Extracts the ordered item URLs from one category page
///
/// Item hrefs are rewritten onto the catalogue URL; hrefs that stay relative
/// are resolved against the category page itself.
pub fn parse_listing(
    category: &Category,
    html: &str,
    context: &RunContext,
) -> Result<ListingResult, ListingError> {
    if html.trim().is_empty() {
        return Err(ListingError::EmptyBody);
    }

    let extraction = extract_html(html, &context.schemas.listing);
    if extraction.is_absent(LISTING) {
        return Err(ListingError::MissingContainer);
    }

    let page_url = Url::parse(&category.url).unwrap_or_else(|_| context.base_url.clone());
    let item_urls = extraction
        .values(ITEM_HREF)
        .iter()
        .map(|href| rewrite_listing_href(href, &context.catalogue_url, &page_url))
        .collect();

    Ok(ListingResult {
        category_name: category.name.clone(),
        item_urls,
    })
}

//! Item detail harvesting
//!
//! Walks every (category, item URL) pair in listing order, fetches the detail
//! page and turns it into an [`ItemRecord`]. Items run one at a time unless
//! `max_concurrent_details` allows more; either way output keeps listing
//! order and a failed item is skipped, never fatal.

use crate::crawler::context::RunContext;
use crate::crawler::extract::extract_html;
use crate::crawler::fetcher::{fetch, FetchError};
use crate::crawler::schema::{AVAILABILITY, DESCRIPTION, PICTURE, PRICE, TITLE, UPC};
use crate::model::{ItemRecord, ListingResult, ABSENT_SENTINEL};
use crate::state::PipelineStage;
use crate::url::resolve_against_base;
use crate::ShelfError;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::Arc;

/// An item that produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSkip {
    pub url: String,
    pub category: String,
    pub error: FetchError,
}

/// Outcome of the harvest stage
#[derive(Debug, Clone, Default)]
pub struct HarvestBatch {
    /// Records in category order, then listing order
    pub records: Vec<ItemRecord>,

    /// Items that were skipped
    pub skipped: Vec<ItemSkip>,
}

/// Fetches and extracts every listed item
///
/// # Errors
///
/// `ShelfError::StageBatch` if an item task panics or is cancelled. Fetch
/// failures and non-200 responses only land in [`HarvestBatch::skipped`].
pub async fn harvest_items(
    client: &Client,
    context: &Arc<RunContext>,
    listings: &[ListingResult],
) -> Result<HarvestBatch, ShelfError> {
    let jobs: Vec<(String, String)> = listings
        .iter()
        .flat_map(|listing| {
            listing
                .item_urls
                .iter()
                .map(move |url| (listing.category_name.clone(), url.clone()))
        })
        .collect();

    let limit = context.max_concurrent_details.max(1);
    tracing::info!("Harvesting {} items (limit {})", jobs.len(), limit);

    // Tasks are spawned lazily by `buffered`, so at most `limit` run at once
    let outcomes: Vec<_> = stream::iter(jobs)
        .map(|(category, url)| {
            let client = client.clone();
            let context = Arc::clone(context);
            tokio::spawn(async move { harvest_item(&client, &context, category, url).await })
        })
        .buffered(limit)
        .collect()
        .await;

    let mut batch = HarvestBatch::default();
    for outcome in outcomes {
        match outcome {
            Ok(Ok(record)) => batch.records.push(record),
            Ok(Err(skip)) => batch.skipped.push(skip),
            Err(e) => {
                return Err(ShelfError::StageBatch {
                    stage: PipelineStage::Harvest,
                    message: format!("item task failed: {}", e),
                })
            }
        }
    }

    Ok(batch)
}

/// Fetches one detail page and builds its record
///
/// Only an HTTP 200 response produces a record.
pub async fn harvest_item(
    client: &Client,
    context: &RunContext,
    category: String,
    url: String,
) -> Result<ItemRecord, ItemSkip> {
    tracing::debug!("Fetching book: {}", url);

    let outcome = match fetch(client, &url, context.timeouts.detail).await {
        Ok(page) if page.status == 200 => Ok(page),
        Ok(page) => Err(FetchError::HttpError(page.status)),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(page) => Ok(parse_item(&page.body, &url, &category, context)),
        Err(error) => {
            match &error {
                FetchError::HttpError(status) => {
                    tracing::error!("[ERROR] Failed to fetch {} - Status: {}", url, status)
                }
                FetchError::Unreachable(reason) => {
                    tracing::error!("[ERROR] Failed to fetch {} - {}", url, reason)
                }
            }
            Err(ItemSkip {
                url,
                category,
                error,
            })
        }
    }
}

/// Builds an item record from detail page HTML
///
/// Missing title, price, description and availability become empty strings;
/// a missing UPC or picture becomes the `"null"` sentinel. The picture path
/// is resolved against the site base URL.
pub fn parse_item(html: &str, url: &str, category: &str, context: &RunContext) -> ItemRecord {
    let extraction = extract_html(html, &context.schemas.detail);
    let first_or_empty = |field: &str| extraction.first(field).unwrap_or_default().to_string();

    let upc = extraction
        .first(UPC)
        .map(str::to_string)
        .unwrap_or_else(|| ABSENT_SENTINEL.to_string());

    let picture_url = extraction
        .first(PICTURE)
        .and_then(|src| resolve_against_base(&context.base_url, src))
        .unwrap_or_else(|| ABSENT_SENTINEL.to_string());

    ItemRecord {
        title: first_or_empty(TITLE),
        price: first_or_empty(PRICE),
        description: first_or_empty(DESCRIPTION),
        upc,
        availability: first_or_empty(AVAILABILITY),
        picture_url,
        source_url: url.to_string(),
        category: category.to_string(),
    }
}

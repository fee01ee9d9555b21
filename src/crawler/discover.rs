//! Category discovery from the site root navigation
//!
//! The root page's navigation list holds an "all books" pseudo-category
//! followed by the real categories. Any failure here is fatal to the run.

use crate::crawler::context::RunContext;
use crate::crawler::extract::extract_html;
use crate::crawler::fetcher::fetch;
use crate::crawler::schema::{CATEGORY_HREF, NAVIGATION};
use crate::model::Category;
use crate::url::derive_category_name;
use crate::ShelfError;
use reqwest::Client;
use std::collections::HashSet;

/// Fetches the site root and returns its categories in navigation order
///
/// # Errors
///
/// * `ShelfError::Fetch` - The root page could not be fetched
/// * `ShelfError::EmptyRootPage` - The root page body was blank
/// * `ShelfError::NavigationMissing` - No navigation list on the page
/// * `ShelfError::NoCategories` - No category survived exclusion
pub async fn discover_categories(
    client: &Client,
    context: &RunContext,
) -> Result<Vec<Category>, ShelfError> {
    let root = context.base_url.as_str();
    tracing::debug!("Fetching root page {}", root);

    let page = fetch(client, root, context.timeouts.discovery)
        .await
        .map_err(|source| ShelfError::Fetch {
            url: root.to_string(),
            source,
        })?;

    if page.is_blank() {
        return Err(ShelfError::EmptyRootPage {
            url: root.to_string(),
        });
    }

    parse_categories(&page.body, context)
}

/// Extracts categories from root page HTML
///
/// The excluded pseudo-category is dropped only when its href matches the
/// configured path exactly. Entries whose href has no name segment are
/// skipped; repeated (name, url) pairs are kept once.
pub fn parse_categories(html: &str, context: &RunContext) -> Result<Vec<Category>, ShelfError> {
    let root = context.base_url.as_str();
    let extraction = extract_html(html, &context.schemas.categories);

    if extraction.is_absent(NAVIGATION) {
        tracing::warn!("[ERROR] Categories not found!");
        return Err(ShelfError::NavigationMissing {
            url: root.to_string(),
        });
    }

    let mut seen = HashSet::new();
    let mut categories = Vec::new();

    for href in extraction.values(CATEGORY_HREF) {
        if is_excluded(href, &context.excluded_category) {
            tracing::debug!("Skipping pseudo-category {}", href);
            continue;
        }

        let Some(name) = derive_category_name(href) else {
            tracing::warn!("Cannot derive a category name from {}", href);
            continue;
        };

        let url = match context.base_url.join(href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("Invalid category href {}: {}", href, e);
                continue;
            }
        };

        let category = Category { name, url };
        if seen.insert(category.clone()) {
            categories.push(category);
        }
    }

    if categories.is_empty() {
        tracing::warn!("[ERROR] Categories not found!");
        return Err(ShelfError::NoCategories {
            url: root.to_string(),
        });
    }

    tracing::info!("Discovered {} categories", categories.len());
    Ok(categories)
}

fn is_excluded(href: &str, excluded: &str) -> bool {
    href == excluded
}

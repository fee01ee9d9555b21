//! Records produced by a crawl run
//!
//! All values here are built once by the stage that produces them and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

/// Value stored for upc and picture when the detail page has no such node
pub const ABSENT_SENTINEL: &str = "null";

/// A category discovered from the site navigation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    /// Display name derived from the category href
    pub name: String,

    /// Absolute URL of the category listing page
    pub url: String,
}

/// Item links collected from one category listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingResult {
    pub category_name: String,

    /// Absolute detail page URLs, in page order
    pub item_urls: Vec<String>,
}

/// A fully extracted item detail page
///
/// Only ever built from a detail page fetched with HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub title: String,
    pub price: String,
    pub description: String,
    pub upc: String,
    pub availability: String,
    #[serde(rename = "picture")]
    pub picture_url: String,
    #[serde(rename = "url")]
    pub source_url: String,
    pub category: String,
}

impl ItemRecord {
    /// Returns true if the detail page carried a UPC row
    pub fn has_upc(&self) -> bool {
        self.upc != ABSENT_SENTINEL
    }

    /// Returns true if the detail page carried a product image
    pub fn has_picture(&self) -> bool {
        self.picture_url != ABSENT_SENTINEL
    }
}

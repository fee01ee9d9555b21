//! Extraction schemas for the three page types of the target site

use crate::crawler::extract::Schema;
use crate::ShelfError;

pub const NAVIGATION: &str = "navigation";
pub const CATEGORY_HREF: &str = "category_href";

pub const LISTING: &str = "listing";
pub const ITEM_HREF: &str = "item_href";

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const PRICE: &str = "price";
pub const AVAILABILITY: &str = "availability";
pub const PICTURE: &str = "picture";
pub const UPC: &str = "upc";

/// Root page: the navigation list and the links inside its first entry
pub fn categories() -> Result<Schema, ShelfError> {
    Schema::new("categories")
        .attr(NAVIGATION, "ul.nav.nav-list", "class")?
        .attr(CATEGORY_HREF, "ul.nav.nav-list > li:first-of-type a", "href")
}

/// Category page: the ordered listing container and each entry's detail link
pub fn listing() -> Result<Schema, ShelfError> {
    Schema::new("listing")
        .attr(LISTING, "ol.row", "class")?
        .attr(ITEM_HREF, "ol.row li h3 a", "href")
}

/// Item detail page
pub fn detail() -> Result<Schema, ShelfError> {
    Schema::new("detail")
        .text(TITLE, "article h1")?
        .text(DESCRIPTION, "#content_inner > article > p")?
        .text(
            PRICE,
            "#content_inner > article > div:nth-of-type(1) > div:nth-of-type(2) > p:nth-of-type(1)",
        )?
        .labeled_cell(AVAILABILITY, "Availability")?
        .attr(PICTURE, "#product_gallery img", "src")?
        .labeled_cell(UPC, "UPC")
}

/// Compiled schemas for one run
#[derive(Debug, Clone)]
pub struct Schemas {
    pub categories: Schema,
    pub listing: Schema,
    pub detail: Schema,
}

impl Schemas {
    /// Compiles every schema, failing on the first malformed selector
    pub fn compile() -> Result<Self, ShelfError> {
        Ok(Self {
            categories: categories()?,
            listing: listing()?,
            detail: detail()?,
        })
    }
}

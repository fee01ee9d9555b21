//! URL handling module for Shelfscan
//!
//! Site-specific URL rules: deriving category names from navigation hrefs,
//! rewriting listing hrefs to absolute detail URLs, and resolving image paths.

mod category;
mod rewrite;

pub use category::derive_category_name;
pub use rewrite::{resolve_against_base, rewrite_listing_href, LISTING_HREF_PREFIX};

use url::Url;

/// Returns the catalogue root of a site (`<base>catalogue/`)
///
/// # Examples
///
/// ```
/// use shelfscan::url::catalogue_url;
/// use url::Url;
///
/// let base = Url::parse("https://books.toscrape.com/").unwrap();
/// assert_eq!(
///     catalogue_url(&base).unwrap().as_str(),
///     "https://books.toscrape.com/catalogue/"
/// );
/// ```
pub fn catalogue_url(base_url: &Url) -> Result<Url, url::ParseError> {
    base_url.join("catalogue/")
}

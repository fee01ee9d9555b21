use url::Url;

/// Relative prefix carried by item links on category listing pages
pub const LISTING_HREF_PREFIX: &str = "../../../";

/// Rewrites a listing page item href into an absolute detail page URL
///
/// Every occurrence of `../../../` is replaced by the catalogue URL. Hrefs
/// that are still relative after the rewrite are resolved against the listing
/// page they were found on.
///
/// # Examples
///
/// ```
/// use shelfscan::url::rewrite_listing_href;
/// use url::Url;
///
/// let catalogue = Url::parse("https://books.toscrape.com/catalogue/").unwrap();
/// let page = Url::parse("https://books.toscrape.com/catalogue/category/books/travel_2/index.html").unwrap();
/// assert_eq!(
///     rewrite_listing_href("../../../its-only-the-himalayas_981/index.html", &catalogue, &page),
///     "https://books.toscrape.com/catalogue/its-only-the-himalayas_981/index.html"
/// );
/// ```
pub fn rewrite_listing_href(href: &str, catalogue_url: &Url, page_url: &Url) -> String {
    let href = href.trim();
    let rewritten = href.replace(LISTING_HREF_PREFIX, catalogue_url.as_str());

    if Url::parse(&rewritten).is_ok() {
        return rewritten;
    }

    match page_url.join(&rewritten) {
        Ok(absolute) => absolute.to_string(),
        Err(_) => rewritten,
    }
}

/// Resolves a path found on a page against the site base URL
///
/// Leading `..` segments cannot climb above the site root, so
/// `../../media/x.jpg` resolves to `<base>media/x.jpg` for a root base URL.
pub fn resolve_against_base(base_url: &Url, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }

    base_url.join(path).ok().map(|url| url.to_string())
}

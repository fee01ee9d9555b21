/// Derives a category display name from its navigation href
///
/// The name is the fourth `/`-separated component of the href, cut at the
/// first underscore, with the first letter upper-cased and the rest
/// lower-cased. `catalogue/category/books/travel_2/index.html` becomes
/// `Travel`.
///
/// # Returns
///
/// * `Some(String)` - The derived name
/// * `None` - The href has too few components or an empty name segment
///
/// # Examples
///
/// ```
/// use shelfscan::url::derive_category_name;
///
/// assert_eq!(
///     derive_category_name("catalogue/category/books/historical-fiction_4/index.html"),
///     Some("Historical-fiction".to_string())
/// );
/// assert_eq!(derive_category_name("index.html"), None);
/// ```
pub fn derive_category_name(href: &str) -> Option<String> {
    let segment = href.split('/').nth(3)?;
    let stem = segment.split('_').next().unwrap_or(segment);

    let mut chars = stem.chars();
    let first = chars.next()?;

    let mut name: String = first.to_uppercase().collect();
    name.push_str(&chars.as_str().to_lowercase());
    Some(name)
}

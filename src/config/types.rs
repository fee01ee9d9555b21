use serde::Deserialize;

/// Path of the "all books" pseudo-category on the target site
pub const DEFAULT_EXCLUDED_CATEGORY: &str = "catalogue/category/books_1/index.html";

/// Main configuration structure for Shelfscan
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Target site description
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL of the site (e.g. "https://books.toscrape.com/")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Navigation href of the all-items pseudo-category, dropped on exact match
    #[serde(rename = "excluded-category", default = "default_excluded_category")]
    pub excluded_category: String,
}

/// Timeouts and concurrency limits for each crawl stage
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Timeout for the root availability probe (milliseconds)
    #[serde(rename = "liveness-timeout-ms", default = "default_liveness_timeout")]
    pub liveness_timeout_ms: u64,

    /// Timeout for the root page fetch used for category discovery (milliseconds)
    #[serde(rename = "discovery-timeout-ms", default = "default_discovery_timeout")]
    pub discovery_timeout_ms: u64,

    /// Timeout for each category page fetch (milliseconds)
    #[serde(rename = "listing-timeout-ms", default = "default_listing_timeout")]
    pub listing_timeout_ms: u64,

    /// Timeout for each item detail page fetch (milliseconds)
    #[serde(rename = "detail-timeout-ms", default = "default_detail_timeout")]
    pub detail_timeout_ms: u64,

    /// Upper bound on simultaneous category fetches; unbounded when absent
    #[serde(rename = "max-concurrent-listings", default)]
    pub max_concurrent_listings: Option<u32>,

    /// Number of detail pages fetched at once; 1 means strictly sequential
    #[serde(
        rename = "max-concurrent-details",
        default = "default_max_concurrent_details"
    )]
    pub max_concurrent_details: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            liveness_timeout_ms: default_liveness_timeout(),
            discovery_timeout_ms: default_discovery_timeout(),
            listing_timeout_ms: default_listing_timeout(),
            detail_timeout_ms: default_detail_timeout(),
            max_concurrent_listings: None,
            max_concurrent_details: default_max_concurrent_details(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database receiving records
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,

    /// Path to the JSON file receiving records
    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,

    /// Path to the markdown run report
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

fn default_excluded_category() -> String {
    DEFAULT_EXCLUDED_CATEGORY.to_string()
}

fn default_liveness_timeout() -> u64 {
    2000
}

fn default_discovery_timeout() -> u64 {
    2000
}

fn default_listing_timeout() -> u64 {
    2000
}

fn default_detail_timeout() -> u64 {
    1000
}

fn default_max_concurrent_details() -> u32 {
    1
}

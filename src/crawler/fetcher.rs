//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with a proper user agent string
//! - GET requests with a caller-chosen timeout
//! - Outcome classification (body, non-2xx status, network failure)
//! - The root availability probe
//!
//! Nothing here retries; a failed call is final and the caller decides
//! whether it is fatal.

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Why a fetch produced no usable body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure, or the body could not be read
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// The server answered with a status the caller rejects
    ///
    /// `fetch` rejects every non-2xx status; item harvesting also rejects
    /// any 2xx other than 200.
    #[error("HTTP status {0}")]
    HttpError(u16),
}

impl FetchError {
    /// Returns the HTTP status for `HttpError`, None otherwise
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpError(status) => Some(*status),
            Self::Unreachable(_) => None,
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code (always 2xx)
    pub status: u16,

    /// Page body content
    pub body: String,
}

impl FetchedPage {
    /// Returns true if the body holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// Builds the HTTP client shared by every stage of a run
///
/// The client carries no overall timeout; each call sets its own.
///
/// # Example
///
/// ```no_run
/// use shelfscan::config::UserAgentConfig;
/// use shelfscan::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "Shelfscan".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent as `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Fetches a URL with a per-call timeout
///
/// # Outcomes
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | `Ok(FetchedPage)` |
/// | Non-2xx status | `Err(HttpError(status))` |
/// | Timeout | `Err(Unreachable)` |
/// | Connection refused / DNS / TLS | `Err(Unreachable)` |
/// | Body read failure | `Err(Unreachable)` |
pub async fn fetch(client: &Client, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpError(status.as_u16()));
    }

    let final_url = response.url().to_string();
    let body = response.text().await.map_err(classify_error)?;

    Ok(FetchedPage {
        url: final_url,
        status: status.as_u16(),
        body,
    })
}

/// Probes the site root and logs whether it is reachable
///
/// The probe never gates the run; its result is only reported.
pub async fn check_liveness(client: &Client, url: &str, timeout: Duration) -> bool {
    match fetch(client, url, timeout).await {
        Ok(page) => {
            tracing::info!("[OK] {} [{}]", url, page.status);
            true
        }
        Err(e) => {
            tracing::warn!("[NOT 200] {} ({})", url, e);
            false
        }
    }
}

fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Unreachable("request timeout".to_string())
    } else if error.is_connect() {
        FetchError::Unreachable(format!("connection failed: {}", error))
    } else {
        FetchError::Unreachable(error.to_string())
    }
}

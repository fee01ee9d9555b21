//! Shelfscan: a catalogue crawler for bookshop-style sites
//!
//! This crate discovers a site's category navigation, collects the item
//! listing of every category concurrently, then harvests each item's detail
//! page into a validated record handed to a sink.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Shelfscan operations
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("Root page {url} returned an empty body")]
    EmptyRootPage { url: String },

    #[error("Navigation list not found on {url}")]
    NavigationMissing { url: String },

    #[error("No categories collected from {url}")]
    NoCategories { url: String },

    #[error("{stage} stage failed: {message}")]
    StageBatch {
        stage: state::PipelineStage,
        message: String,
    },

    #[error("Invalid stage transition: {from} -> {to}")]
    InvalidTransition {
        from: state::PipelineStage,
        to: state::PipelineStage,
    },

    #[error("Invalid selector '{selector}' in schema '{schema}': {message}")]
    Selector {
        schema: String,
        selector: String,
        message: String,
    },

    #[error("Sink error: {0}")]
    Sink(#[from] storage::SinkError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Shelfscan operations
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Pipeline, RunContext};
pub use model::{Category, ItemRecord, ListingResult};
pub use state::PipelineStage;
pub use storage::RecordSink;

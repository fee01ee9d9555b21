//! Configuration module for Shelfscan
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use shelfscan::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("shelfscan.toml")).unwrap();
//! println!("Crawling {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetchConfig, OutputConfig, SiteConfig, UserAgentConfig, DEFAULT_EXCLUDED_CATEGORY,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

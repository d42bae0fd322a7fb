//! Autospot crawler: a three-level catalog scraper
//!
//! This crate crawls a car catalog organised as brand → model → price sheet,
//! extracting each level into typed records and persisting them as JSON
//! artifacts keyed by transliterated aliases.

pub mod alias;
pub mod catalog;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] crawler::FetchError),

    #[error("Parse error for {url}: {source}")]
    Parse {
        url: String,
        source: extract::ExtractError,
    },

    #[error("Storage error for {key}: {source}")]
    Storage {
        key: String,
        source: storage::StorageError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Crawl incomplete: {failed} of {attempted} tasks failed")]
    Incomplete { failed: usize, attempted: usize },
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

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use alias::alias;
pub use catalog::{Brand, Model, PriceSheet};
pub use config::Config;
pub use output::CrawlReport;

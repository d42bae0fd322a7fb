//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All settings have defaults, so a crawl can also run from [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use autospot_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawling {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Backend, Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;

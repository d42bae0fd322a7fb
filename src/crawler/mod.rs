//! Crawler module for the catalog cascade
//!
//! This module contains the core crawling logic, including:
//! - Page fetching over HTTP
//! - Stage bookkeeping for concurrent fan-out and fan-in
//! - Overall crawl coordination across the brand, model and price stages

mod coordinator;
mod fetcher;
mod stage;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, resolve_link, FetchError, HttpFetcher, PageFetcher};
pub use stage::{settle, Stage, StageReport, TaskFailure};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and open the storage backend
/// 2. Crawl the catalog index and persist the brand list
/// 3. Crawl every brand's listing and persist its model list
/// 4. Crawl every model's price page and persist its price sheet
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The cascade ran; check the report for failed tasks
/// * `Err(CrawlError)` - Setup or the brand stage failed
pub async fn crawl(config: Config) -> Result<CrawlReport, CrawlError> {
    run_crawl(config).await
}

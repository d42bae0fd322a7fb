//! Crawler coordinator - the brand → model → price cascade
//!
//! The coordinator runs three stages in strict sequence:
//! 1. Brand: fetch the catalog index, persist `brands.json`, collect model links
//! 2. Model: for every brand concurrently, fetch its listing, persist
//!    `models/<brand>.json`, collect price links
//! 3. Price: for every model concurrently, fetch its price page and persist
//!    `prices/<brand>_<model>.json`
//!
//! Within a stage all tasks are polled together on the current task and the
//! stage waits for every one of them to settle. A failed task never cancels
//! its siblings; whatever they persisted stays persisted, and the failure is
//! recorded in the stage's [`StageReport`].

use crate::catalog::{models_key, prices_key, ModelLink, PriceLink, BRANDS_KEY};
use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, resolve_link, HttpFetcher, PageFetcher};
use crate::crawler::stage::{settle, Stage, StageReport};
use crate::extract::{extract_brands, extract_models, extract_price_sheet};
use crate::output::CrawlReport;
use crate::storage::{open_storage, store_json, Persister};
use crate::{ConfigError, CrawlError};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    base_url: Url,
    fetcher: Arc<dyn PageFetcher>,
    storage: Arc<dyn Persister>,
    /// Bounds in-flight fetches when configured
    limiter: Option<Semaphore>,
    halt_on_stage_failure: bool,
}

impl Coordinator {
    /// Creates a coordinator over the given fetcher and storage
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL and crawler settings are taken from here
    /// * `fetcher` - Source of page markup
    /// * `storage` - Sink for artifacts
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn PageFetcher>,
        storage: Arc<dyn Persister>,
    ) -> Result<Self, CrawlError> {
        let base_url = Url::parse(&config.site.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.site.base_url, e))
        })?;

        let limiter = match config.crawler.max_concurrent_fetches {
            0 => None,
            n => Some(Semaphore::new(n as usize)),
        };

        Ok(Self {
            base_url,
            fetcher,
            storage,
            limiter,
            halt_on_stage_failure: config.crawler.halt_on_stage_failure,
        })
    }

    /// Creates a coordinator with the HTTP fetcher and the configured storage backend
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let storage = open_storage(&config.output).map_err(|source| CrawlError::Storage {
            key: config.output.database_path.clone(),
            source,
        })?;
        Self::new(config, Arc::new(HttpFetcher::new(client)), storage)
    }

    /// Runs the full cascade
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - All stages ran; the report may still hold failed tasks
    /// * `Err(CrawlError)` - The brand stage failed, so nothing could fan out
    pub async fn run(&self) -> Result<CrawlReport, CrawlError> {
        let started = Instant::now();
        let mut report = CrawlReport::default();

        tracing::info!(base_url = %self.base_url, "Starting crawl");

        let model_links = self.run_brand_stage().await?;
        report.stages.push(StageReport {
            stage: Stage::Brand,
            attempted: 1,
            succeeded: 1,
            failures: Vec::new(),
        });

        let (price_links, model_report) = self.run_model_stage(&model_links).await;
        let halt = self.halt_on_stage_failure && !model_report.is_success();
        report.stages.push(model_report);

        if halt {
            tracing::warn!("Model stage recorded failures, skipping price stage");
        } else {
            report.stages.push(self.run_price_stage(&price_links).await);
        }

        report.elapsed = started.elapsed();
        tracing::info!(
            "Crawl finished in {:?}: {} of {} tasks failed",
            report.elapsed,
            report.failed(),
            report.attempted()
        );

        Ok(report)
    }

    /// Fetches the catalog index, persists the brand list and returns the model links
    pub async fn run_brand_stage(&self) -> Result<Vec<ModelLink>, CrawlError> {
        tracing::info!(stage = %Stage::Brand, "Stage started");

        let url = self.base_url.clone();
        let html = self.fetch_page(&url).await?;
        let page = extract_brands(&html).map_err(|source| CrawlError::Parse {
            url: url.to_string(),
            source,
        })?;
        self.persist(BRANDS_KEY, &page.brands).await?;

        tracing::info!(stage = %Stage::Brand, brands = page.brands.len(), "Stage finished");
        Ok(page.links)
    }

    /// Crawls every brand's listing concurrently and returns the price links of
    /// the brands that succeeded
    pub async fn run_model_stage(&self, links: &[ModelLink]) -> (Vec<PriceLink>, StageReport) {
        tracing::info!(stage = %Stage::Model, brands = links.len(), "Stage started");

        let outcomes = join_all(links.iter().map(|link| async move {
            (link.brand.clone(), self.crawl_brand(link).await)
        }))
        .await;

        let (link_sets, report) = settle(Stage::Model, outcomes);
        let price_links: Vec<PriceLink> = link_sets.into_iter().flatten().collect();

        tracing::info!(
            stage = %Stage::Model,
            succeeded = report.succeeded,
            failed = report.failed(),
            models = price_links.len(),
            "Stage finished"
        );
        (price_links, report)
    }

    /// Crawls every price page concurrently
    pub async fn run_price_stage(&self, links: &[PriceLink]) -> StageReport {
        tracing::info!(stage = %Stage::Price, models = links.len(), "Stage started");

        let outcomes = join_all(links.iter().map(|link| async move {
            (link.model.clone(), self.crawl_model(link).await)
        }))
        .await;

        let (_, report) = settle(Stage::Price, outcomes);

        tracing::info!(
            stage = %Stage::Price,
            succeeded = report.succeeded,
            failed = report.failed(),
            "Stage finished"
        );
        report
    }

    /// Fetch → extract → persist for one brand
    async fn crawl_brand(&self, link: &ModelLink) -> Result<Vec<PriceLink>, CrawlError> {
        let url = resolve_link(&self.base_url, &link.link)?;
        let html = self.fetch_page(&url).await?;
        let page = extract_models(&html, &link.brand).map_err(|source| CrawlError::Parse {
            url: url.to_string(),
            source,
        })?;
        self.persist(&models_key(&link.brand), &page.models).await?;

        tracing::debug!(brand = %link.brand, models = page.models.len(), "Brand crawled");
        Ok(page.links)
    }

    /// Fetch → extract → persist for one model
    async fn crawl_model(&self, link: &PriceLink) -> Result<(), CrawlError> {
        let url = resolve_link(&self.base_url, &link.link)?;
        let html = self.fetch_page(&url).await?;
        let sheet = extract_price_sheet(&html).map_err(|source| CrawlError::Parse {
            url: url.to_string(),
            source,
        })?;
        self.persist(&prices_key(&link.model), &sheet).await?;

        tracing::debug!(
            model = %link.model,
            discounts = sheet.discount.len(),
            cards = sheet.price.len(),
            "Model crawled"
        );
        Ok(())
    }

    async fn fetch_page(&self, url: &Url) -> Result<String, CrawlError> {
        // A closed semaphore would only mean no limit; it is never closed.
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };

        tracing::debug!(url = %url, "Fetching");
        Ok(self.fetcher.fetch(url).await?)
    }

    async fn persist<T>(&self, key: &str, value: &T) -> Result<(), CrawlError>
    where
        T: Serialize + ?Sized,
    {
        store_json(self.storage.as_ref(), key, value)
            .await
            .map_err(|source| CrawlError::Storage {
                key: key.to_string(),
                source,
            })
    }
}

/// Runs the main crawl operation
///
/// Builds the HTTP fetcher and storage backend from `config` and runs the
/// cascade to completion.
///
/// # Example
///
/// ```no_run
/// use autospot_crawler::config::Config;
/// use autospot_crawler::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default()).await?;
/// report.into_result()?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, CrawlError> {
    let coordinator = Coordinator::from_config(&config)?;
    coordinator.run().await
}

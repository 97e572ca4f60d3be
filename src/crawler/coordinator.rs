//! Crawl coordinator - main orchestration logic
//!
//! Fetches the index page once, extracts the catalog rows, then fans the rows
//! out to a bounded pool of concurrent resolver invocations and aggregates a
//! [`CrawlReport`]. The index fetch gets no retry: with nothing to resolve, a
//! failure there is fatal to the whole run, unlike per-row detail fetches.

use crate::config::Config;
use crate::crawler::extract::extract_rows;
use crate::crawler::fetcher::{build_http_client, fetch, FetchOutcome};
use crate::crawler::resolver::{ResolutionFailed, ResolvedWriteup, Resolver};
use crate::HarvestError;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use url::Url;

/// Aggregated outcome of one crawl run
///
/// Every extracted row appears exactly once, either as a resolved record or
/// as an explicit failure entry; rows are never silently dropped.
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Successfully resolved write-ups, in completion order
    pub resolved: Vec<ResolvedWriteup>,

    /// Rows that exhausted their retry budget
    pub failed: Vec<ResolutionFailed>,
}

impl CrawlReport {
    /// Total number of rows accounted for
    pub fn total(&self) -> usize {
        self.resolved.len() + self.failed.len()
    }

    /// True when no row failed terminally
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Main crawl coordinator
pub struct Coordinator {
    config: Config,
    client: Client,
    base_url: Url,
}

impl Coordinator {
    /// Creates a coordinator from a validated configuration
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.http)?;
        let base_url = Url::parse(&config.crawler.base_url)?;

        Ok(Self {
            config,
            client,
            base_url,
        })
    }

    /// URL of the index page for the configured tag
    fn index_url(&self) -> Result<Url, url::ParseError> {
        let tag = &self.config.crawler.tag;
        self.base_url
            .join(&format!("/writeups?tags={}&hidden-tags={}", tag, tag))
    }

    /// Runs the crawl
    ///
    /// Steps: fetch the index page (single attempt), extract the rows
    /// (structural failure is fatal), resolve each row through the bounded
    /// pool, and collect every outcome. The pool is scoped to this call and
    /// torn down on every exit path.
    pub async fn run(&self) -> Result<CrawlReport, HarvestError> {
        let index_url = self.index_url()?;

        let body = match fetch(&self.client, index_url.as_str()).await {
            FetchOutcome::Success { body, .. } => body,
            FetchOutcome::Transient { status } => {
                return Err(HarvestError::CrawlAborted { status });
            }
        };

        let rows = extract_rows(&body)?;
        tracing::info!("Fetched the write-ups list: {} entries", rows.len());

        let resolver = Resolver::new(
            self.client.clone(),
            self.base_url.clone(),
            &self.config.crawler,
        );
        let width = self.config.crawler.max_concurrent_fetches as usize;

        // Bounded fan-out: at most `width` resolutions hold an active fetch
        // at once, and results arrive in completion order.
        let outcomes: Vec<Result<ResolvedWriteup, ResolutionFailed>> =
            stream::iter(rows.into_iter().map(|row| resolver.resolve(row)))
                .buffer_unordered(width)
                .collect()
                .await;

        let mut report = CrawlReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(resolved) => report.resolved.push(resolved),
                Err(failure) => {
                    tracing::warn!("{}", failure);
                    report.failed.push(failure);
                }
            }
        }

        tracing::info!(
            "Retrieved the write-up URLs: {} resolved, {} failed",
            report.resolved.len(),
            report.failed.len()
        );

        Ok(report)
    }
}

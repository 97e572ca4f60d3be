//! Crawler module for index enumeration and write-up resolution
//!
//! This module contains the core pipeline:
//! - HTTP fetching with transient-failure classification
//! - HTML extraction for the index and detail pages
//! - Per-row resolution with retry and exponential backoff
//! - Bounded-concurrency crawl coordination

mod coordinator;
mod extract;
mod fetcher;
mod resolver;

pub use coordinator::{Coordinator, CrawlReport};
pub use extract::{extract_detail_links, extract_rows, DetailLinks, WriteupRow};
pub use fetcher::{build_http_client, fetch, FetchOutcome, STATUS_NETWORK_ERROR};
pub use resolver::{choose_url, ResolutionFailed, ResolvedWriteup, Resolver};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete crawl
///
/// Fetches the index page, resolves every catalog row through the bounded
/// pool, and returns the aggregated report.
pub async fn crawl(config: Config) -> Result<CrawlReport, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}

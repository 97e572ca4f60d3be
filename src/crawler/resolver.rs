//! Per-row write-up resolution with retry and backoff
//!
//! For one catalog row, the resolver fetches the detail page, applies the
//! fallback decision rule, and retries on transient failures with exponential
//! backoff and jitter. Each attempt produces an explicit [`AttemptOutcome`]
//! and the retry loop is driven by matching on it.

use crate::config::CrawlerConfig;
use crate::crawler::extract::{extract_detail_links, DetailLinks, WriteupRow};
use crate::crawler::fetcher::{fetch, FetchOutcome};
use rand::Rng;
use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

/// A successfully resolved catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWriteup {
    /// CTF event name
    pub event: String,

    /// Task name
    pub task: String,

    /// Canonical write-up URL; never empty, falls back to the detail page URL
    pub url: String,
}

/// Terminal failure for a single row
///
/// Raised only after the full retry budget is exhausted (or the run deadline
/// cut resolution short). Never aborts sibling resolutions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not resolve write-up URL for {event} - {task} after {attempts} attempts")]
pub struct ResolutionFailed {
    pub event: String,
    pub task: String,
    pub attempts: u32,
}

/// Outcome of a single resolution attempt
#[derive(Debug)]
enum AttemptOutcome {
    /// The decision rule produced a URL
    Resolved(String),

    /// The detail fetch failed transiently with this status
    Transient(u16),
}

/// Resolves catalog rows into canonical write-up URLs
///
/// Holds only shared read-only state; `resolve` borrows immutably so any
/// number of resolutions can run concurrently over one instance.
pub struct Resolver {
    client: Client,
    base_url: Url,
    max_retries: u32,
    deadline: Option<Instant>,
}

impl Resolver {
    /// Creates a resolver for one crawl run
    ///
    /// `deadline`, when set, stops new attempts from being issued once it
    /// passes; attempts already in flight complete or time out on their own.
    pub fn new(client: Client, base_url: Url, config: &CrawlerConfig) -> Self {
        let deadline = config
            .deadline_secs
            .map(|secs| Instant::now() + Duration::from_secs(secs));

        Self {
            client,
            base_url,
            max_retries: config.max_retries,
            deadline,
        }
    }

    /// Resolves one row, retrying transient failures up to the attempt cap
    pub async fn resolve(&self, row: WriteupRow) -> Result<ResolvedWriteup, ResolutionFailed> {
        let detail_url = match self.base_url.join(&row.path) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("Unjoinable detail path '{}': {}", row.path, e);
                return Err(self.failed(&row, 0));
            }
        };

        for attempt in 0..self.max_retries {
            if self.deadline_passed() {
                tracing::warn!(
                    "Run deadline reached, giving up on {} - {} after {} attempts",
                    row.event,
                    row.task,
                    attempt
                );
                return Err(self.failed(&row, attempt));
            }

            match self.attempt(&detail_url).await {
                AttemptOutcome::Resolved(url) => {
                    tracing::debug!("Fetched write-up URL for {} - {}", row.event, row.task);
                    return Ok(ResolvedWriteup {
                        event: row.event,
                        task: row.task,
                        url,
                    });
                }
                AttemptOutcome::Transient(status) => {
                    let delay = backoff_delay(attempt);
                    tracing::debug!(
                        "Attempt {} for {} - {} failed (status {}), retrying in {}ms",
                        attempt + 1,
                        row.event,
                        row.task,
                        status,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(self.failed(&row, self.max_retries))
    }

    /// One fetch-and-extract pass over the detail page
    async fn attempt(&self, detail_url: &str) -> AttemptOutcome {
        match fetch(&self.client, detail_url).await {
            FetchOutcome::Success { body, .. } => {
                AttemptOutcome::Resolved(choose_url(extract_detail_links(&body), detail_url))
            }
            FetchOutcome::Transient { status } => AttemptOutcome::Transient(status),
        }
    }

    fn deadline_passed(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }

    fn failed(&self, row: &WriteupRow, attempts: u32) -> ResolutionFailed {
        ResolutionFailed {
            event: row.event.clone(),
            task: row.task.clone(),
            attempts,
        }
    }
}

/// Applies the fallback decision rule, in strict priority order
///
/// An inline description link wins over the "Original writeup" anchor, which
/// wins over the detail page's own URL. The result is never empty.
pub fn choose_url(links: DetailLinks, detail_url: &str) -> String {
    match links {
        DetailLinks {
            inline: Some(url), ..
        } => url,
        DetailLinks {
            original: Some(url),
            ..
        } => url,
        DetailLinks { .. } => detail_url.to_string(),
    }
}

/// Backoff delay for the given attempt index, with a fresh jitter draw
///
/// The fresh draw per attempt keeps concurrent resolvers from retrying in
/// lockstep after a shared rate-limit response.
fn backoff_delay(attempt: u32) -> Duration {
    backoff_delay_with_jitter(attempt, rand::rng().random())
}

/// `2^(attempt + jitter) / 1000` seconds, for `jitter` in `[0, 1)`
///
/// The delay roughly doubles each retry and is randomized within each
/// doubling: attempt 0 sleeps 1-2ms, attempt 10 sleeps 1-2s.
fn backoff_delay_with_jitter(attempt: u32, jitter: f64) -> Duration {
    Duration::from_secs_f64((attempt as f64 + jitter).exp2() / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::build_http_client;
    use crate::config::HttpConfig;

    #[test]
    fn test_backoff_doubles_without_jitter() {
        assert_eq!(backoff_delay_with_jitter(0, 0.0), Duration::from_millis(1));
        assert_eq!(backoff_delay_with_jitter(1, 0.0), Duration::from_millis(2));
        assert_eq!(backoff_delay_with_jitter(3, 0.0), Duration::from_millis(8));
        assert_eq!(
            backoff_delay_with_jitter(10, 0.0),
            Duration::from_millis(1024)
        );
    }

    #[test]
    fn test_backoff_monotonic_for_fixed_jitter() {
        for jitter in [0.0, 0.25, 0.5, 0.99] {
            let mut previous = Duration::ZERO;
            for attempt in 0..15 {
                let delay = backoff_delay_with_jitter(attempt, jitter);
                assert!(delay > previous, "attempt {} did not grow", attempt);
                previous = delay;
            }
        }
    }

    #[test]
    fn test_backoff_jitter_stays_within_the_doubling() {
        for attempt in 0..15 {
            let low = backoff_delay_with_jitter(attempt, 0.0);
            let high = backoff_delay_with_jitter(attempt, 0.999_999);
            let next = backoff_delay_with_jitter(attempt + 1, 0.0);
            assert!(high > low);
            assert!(high < next);
        }
    }

    #[test]
    fn test_backoff_draws_fresh_jitter() {
        // 32 draws for the same attempt landing on the same delay would mean
        // the jitter is not being re-sampled.
        let first = backoff_delay(5);
        let varied = (0..32).map(|_| backoff_delay(5)).any(|d| d != first);
        assert!(varied);
    }

    #[test]
    fn test_choose_url_prefers_inline_link() {
        let links = DetailLinks {
            inline: Some("https://github.com/a/a".to_string()),
            original: Some("https://blog.example/b".to_string()),
        };
        assert_eq!(
            choose_url(links, "https://ctftime.org/writeup/1"),
            "https://github.com/a/a"
        );
    }

    #[test]
    fn test_choose_url_falls_back_to_original() {
        let links = DetailLinks {
            inline: None,
            original: Some("https://blog.example/b".to_string()),
        };
        assert_eq!(
            choose_url(links, "https://ctftime.org/writeup/1"),
            "https://blog.example/b"
        );
    }

    #[test]
    fn test_choose_url_falls_back_to_detail_page() {
        assert_eq!(
            choose_url(DetailLinks::default(), "https://ctftime.org/writeup/1"),
            "https://ctftime.org/writeup/1"
        );
    }

    #[tokio::test]
    async fn test_expired_deadline_fails_without_fetching() {
        let client = build_http_client(&HttpConfig::default()).unwrap();
        let config = CrawlerConfig {
            deadline_secs: Some(1),
            ..CrawlerConfig::default()
        };
        let mut resolver = Resolver::new(
            client,
            Url::parse("http://192.0.2.1/").unwrap(),
            &config,
        );
        // Move the deadline into the past; no attempt should be issued.
        resolver.deadline = Some(Instant::now() - Duration::from_secs(1));

        let row = WriteupRow {
            event: "CTF1".to_string(),
            task: "pwn200".to_string(),
            path: "/writeup/1".to_string(),
        };
        let err = resolver.resolve(row).await.unwrap_err();
        assert_eq!(err.attempts, 0);
    }
}

//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the shared HTTP client with the configured browser identity
//! - Single GET requests against index and detail pages
//! - Classifying failures as transient
//!
//! No retry happens at this layer; retry is the resolver's responsibility.

use crate::config::HttpConfig;
use reqwest::Client;
use std::time::Duration;

/// Sentinel status recorded when no HTTP status was received at all
/// (unreachable host, timeout, malformed response).
pub const STATUS_NETWORK_ERROR: u16 = 0;

/// Outcome of a single fetch
///
/// Anything other than a 200 response is a transient failure: the remote site
/// rate-limits aggressively, so non-success statuses and network faults are
/// both presumed recoverable by retrying.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 200 response with its body
    Success { body: String, status: u16 },

    /// Non-200 status or network-level fetch error
    Transient { status: u16 },
}

impl FetchOutcome {
    /// Returns the status code carried by either variant
    pub fn status(&self) -> u16 {
        match self {
            FetchOutcome::Success { status, .. } => *status,
            FetchOutcome::Transient { status } => *status,
        }
    }
}

/// Builds the HTTP client shared by all fetches
///
/// The client carries a realistic browser user-agent (the catalog site serves
/// a different, stripped-down page to obvious bots) plus request and connect
/// timeouts from the configuration.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one GET against `url` and classifies the result
///
/// Exactly one network round trip. A response whose status is not 200, or any
/// error before a response arrives, comes back as [`FetchOutcome::Transient`];
/// the caller decides whether to retry.
pub async fn fetch(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();

            if status != 200 {
                tracing::debug!("GET {} returned status {}", url, status);
                return FetchOutcome::Transient { status };
            }

            match response.text().await {
                Ok(body) => FetchOutcome::Success { body, status },
                Err(e) => {
                    tracing::debug!("GET {} body read failed: {}", url, e);
                    FetchOutcome::Transient {
                        status: STATUS_NETWORK_ERROR,
                    }
                }
            }
        }
        Err(e) => {
            tracing::debug!("GET {} failed: {}", url, e);
            FetchOutcome::Transient {
                status: STATUS_NETWORK_ERROR,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let config = HttpConfig::default();
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_outcome_status_accessor() {
        let success = FetchOutcome::Success {
            body: "hello".to_string(),
            status: 200,
        };
        assert_eq!(success.status(), 200);

        let transient = FetchOutcome::Transient { status: 503 };
        assert_eq!(transient.status(), 503);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transient_with_sentinel() {
        let config = HttpConfig {
            request_timeout_secs: 1,
            connect_timeout_secs: 1,
            ..HttpConfig::default()
        };
        let client = build_http_client(&config).unwrap();

        // Reserved TEST-NET-1 address, nothing listens there.
        let outcome = fetch(&client, "http://192.0.2.1:9/").await;
        match outcome {
            FetchOutcome::Transient { status } => assert_eq!(status, STATUS_NETWORK_ERROR),
            FetchOutcome::Success { .. } => panic!("expected a transient failure"),
        }
    }
}

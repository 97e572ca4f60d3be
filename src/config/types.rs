use serde::Deserialize;

/// Browser identity string sent with every request, matching what a desktop
/// Chrome install would send.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/71.0.3578.98 Safari/537.36";

/// Main configuration structure for Writeup-Harvest
///
/// Every field carries a default, so the TOML file is optional and may be
/// partial; the reference behavior runs entirely on the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Base URL of the write-up catalog site
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Write-up tag to filter the index page on
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Maximum number of detail pages fetched in parallel
    #[serde(rename = "max-concurrent-fetches", default = "default_concurrency")]
    pub max_concurrent_fetches: u32,

    /// Maximum fetch attempts per write-up before giving up on it
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Optional run deadline in seconds; once exceeded, resolvers stop
    /// issuing new attempts and in-flight fetches run to completion
    #[serde(rename = "deadline-secs", default)]
    pub deadline_secs: Option<u64>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tag: default_tag(),
            max_concurrent_fetches: default_concurrency(),
            max_retries: default_max_retries(),
            deadline_secs: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://ctftime.org".to_string()
}

fn default_tag() -> String {
    "pwn".to_string()
}

fn default_concurrency() -> u32 {
    7
}

fn default_max_retries() -> u32 {
    15
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_constants() {
        let config = Config::default();
        assert_eq!(config.crawler.base_url, "https://ctftime.org");
        assert_eq!(config.crawler.tag, "pwn");
        assert_eq!(config.crawler.max_concurrent_fetches, 7);
        assert_eq!(config.crawler.max_retries, 15);
        assert_eq!(config.crawler.deadline_secs, None);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[crawler]
max-concurrent-fetches = 3
"#,
        )
        .unwrap();

        assert_eq!(config.crawler.max_concurrent_fetches, 3);
        assert_eq!(config.crawler.max_retries, 15);
        assert_eq!(config.http.request_timeout_secs, 30);
    }

    #[test]
    fn test_empty_toml_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.crawler.base_url, "https://ctftime.org");
        assert!(config.http.user_agent.starts_with("Mozilla/5.0"));
    }
}

//! Writeup-Harvest: a CTF write-up URL resolver
//!
//! This crate enumerates the catalogued pwn write-ups from the CTFtime index
//! page, then resolves the canonical external write-up URL for each entry by
//! fetching its detail page and applying a fixed fallback rule, under bounded
//! concurrency with retry-and-backoff on transient fetch failures.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Writeup-Harvest operations
///
/// Transient fetch failures never appear here; they are contained inside the
/// resolver's retry loop. Everything in this enum is fatal to the whole run.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Index fetch failed with status {status}, nothing to resolve")]
    CrawlAborted { status: u16 },

    #[error("Index page structure drift: {0}")]
    IndexStructure(#[from] ExtractError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
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

/// Structural extraction errors
///
/// The expected markup shape was absent on the index page. This indicates the
/// remote site changed its layout, not a transient fault, so it aborts the
/// crawl rather than being retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("writeups table not found in index page")]
    TableMissing,

    #[error("index row {index} is missing its {field}")]
    RowField { index: usize, field: &'static str },
}

/// Result type alias for Writeup-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, ResolutionFailed, ResolvedWriteup, WriteupRow};

//! Configuration module for Writeup-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every setting has a default matching the reference
//! behavior, so running without a file is fully supported.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, DEFAULT_USER_AGENT};

// Re-export parser and validation functions
pub use parser::load_config;
pub use validation::validate;

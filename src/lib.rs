//! api-catalog: an API endpoint cataloguer for paginated documentation sites
//!
//! This crate drives a rendering session (a headless browser or a plain HTTP
//! fetcher) through "Next"-linked documentation pages, scrapes the HTTP method,
//! path and title each page documents, and reports the endpoints in the order
//! they were discovered.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod render;
pub mod state;

use std::time::Duration;
use thiserror::Error;

/// Main error type for api-catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to acquire rendering session: {0}")]
    SessionAcquisition(String),

    #[error("Rendering session error: {0}")]
    Session(String),

    #[error("Page error: {0}")]
    Page(#[from] PageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors scoped to a single page visit
///
/// These never abort a run: the driver ends the current seed's traversal and
/// moves on to the next seed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Rendering {url} exceeded {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Extraction on {url} failed: {message}")]
    Extraction { url: String, message: String },
}

impl PageError {
    /// The URL of the page that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Navigation { url, .. } | Self::Timeout { url, .. } | Self::Extraction { url, .. } => {
                url
            }
        }
    }
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

/// Result type alias for api-catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for single page operations
pub type PageResult<T> = std::result::Result<T, PageError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlDriver, CrawlRun, Endpoint};
pub use extract::{DocPageExtractor, Extractor, HttpMethod, PageRecord, PageSnapshot};
pub use state::{CrawlState, SeedOutcome, StopReason};

//! Configuration module for api-catalog
//!
//! The crawler runs from built-in defaults. A TOML file can override any of
//! them; it is parsed, validated and hashed here.
//!
//! # Example
//!
//! ```no_run
//! use api_catalog::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("catalog.toml")).unwrap();
//! println!("Page cap per seed: {}", config.crawler.max_pages_per_seed);
//! ```

pub mod defaults;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, BrowserMode, Config, CrawlerConfig, LinksConfig, OutputConfig, SectionEntry,
    WaitUntil,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

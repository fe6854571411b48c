//! Output module for reporting crawl results
//!
//! This module handles:
//! - Emitting the endpoint catalog and link inventory as JSON
//! - Generating a markdown catalog of a crawl
//! - Computing and logging run statistics

mod json;
mod markdown;
pub mod stats;
mod traits;

pub use json::{format_json, JsonReporter};
pub use markdown::{format_markdown_catalog, generate_markdown_catalog, CatalogInfo};
pub use stats::{log_statistics, RunStatistics};
pub use traits::{
    CrawlReport, LinkEntry, LinkReport, OutputError, OutputResult, Report, Reporter,
};

//! State module for tracking traversal progress
//!
//! # Components
//!
//! - `CrawlState`: where a seed's traversal is (start, rendering, extracting, deciding, done)
//! - `StopReason`: why a traversal ended without an error
//! - `SeedOutcome`: completed vs terminated-by-error, as reported per seed

mod crawl_state;

// Re-export main types
pub use crawl_state::{CrawlState, SeedOutcome, StopReason};

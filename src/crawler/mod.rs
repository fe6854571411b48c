//! Crawler module for documentation traversal
//!
//! This module contains the core crawling logic, including:
//! - Visited-set and per-seed budget tracking
//! - The seed-by-seed "Next" chain driver
//! - Link inventory collection from index pages

mod driver;
mod frontier;
mod links;

pub use driver::{CrawlDriver, CrawlRun, SeedReport};
pub use frontier::{Admission, CrawlBudget, Frontier, VisitedSet};
pub use links::{LinkCollector, LinkRun};

pub use crate::extract::Endpoint;

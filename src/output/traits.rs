//! Reporter traits and report types
//!
//! This module defines the trait interface for reporters and the shape of the
//! documents they emit.

use crate::crawler::{CrawlRun, LinkRun};
use crate::extract::{Anchor, Endpoint};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// The endpoint catalog document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    pub success: bool,
    pub total_endpoints: usize,
    pub endpoints: Vec<Endpoint>,
}

impl CrawlReport {
    /// A successful report of every endpoint in discovery order
    ///
    /// A run only exists once a session was acquired, so it always succeeds.
    pub fn from_run(run: &CrawlRun) -> Self {
        Self {
            success: true,
            total_endpoints: run.endpoints.len(),
            endpoints: run.endpoints.clone(),
        }
    }
}

/// The link inventory document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkReport {
    pub success: bool,
    pub total_links: usize,
    pub links: Vec<LinkEntry>,
    pub total_spec_urls: usize,
    pub spec_urls: Vec<String>,
}

/// One inventory entry, href first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    pub href: String,
    pub text: String,
}

impl From<&Anchor> for LinkEntry {
    fn from(anchor: &Anchor) -> Self {
        Self {
            href: anchor.href.clone(),
            text: anchor.text.clone(),
        }
    }
}

impl LinkReport {
    pub fn from_run(run: &LinkRun) -> Self {
        Self {
            success: true,
            total_links: run.links.len(),
            links: run.links.iter().map(LinkEntry::from).collect(),
            total_spec_urls: run.spec_urls.len(),
            spec_urls: run.spec_urls.clone(),
        }
    }
}

/// Any document a reporter can emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Endpoints(CrawlReport),
    Links(LinkReport),
}

impl From<CrawlReport> for Report {
    fn from(report: CrawlReport) -> Self {
        Self::Endpoints(report)
    }
}

impl From<LinkReport> for Report {
    fn from(report: LinkReport) -> Self {
        Self::Links(report)
    }
}

/// Trait for reporters
///
/// A reporter is handed the final document exactly once, at the end of a run.
pub trait Reporter {
    fn emit(&mut self, report: &Report) -> OutputResult<()>;
}

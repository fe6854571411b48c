//! Anchor filtering and spec URL discovery for the link inventory

use crate::config::LinksConfig;
use crate::extract::{Anchor, PageSnapshot};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

lazy_static! {
    /// An absolute URL ending in a JSON or YAML file extension
    static ref SPEC_URL_PATTERN: Regex =
        Regex::new(r"https?://\S+\.(?:json|yaml|yml)").expect("spec URL pattern is valid");
}

/// OpenAPI document URLs written out in page text, in order of appearance
pub fn find_spec_urls(text: &str) -> Vec<String> {
    SPEC_URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Selects documentation anchors from a page
#[derive(Debug, Clone)]
pub struct LinkFilter {
    markers: Vec<String>,
    max_text_len: usize,
    keep_empty_text: bool,
}

impl LinkFilter {
    pub fn new(markers: Vec<String>, max_text_len: usize) -> Self {
        Self {
            markers,
            max_text_len,
            keep_empty_text: false,
        }
    }

    pub fn from_config(config: &LinksConfig) -> Self {
        Self::new(config.markers.clone(), config.max_text_len)
            .keep_empty_text(config.keep_empty_text)
    }

    /// Whether anchors with blank text are kept
    pub fn keep_empty_text(mut self, keep: bool) -> Self {
        self.keep_empty_text = keep;
        self
    }

    /// Anchors whose href contains a marker and whose trimmed text is
    /// shorter than the limit, in document order. Blank text is dropped
    /// unless the filter keeps it.
    pub fn select(&self, snapshot: &PageSnapshot) -> Vec<Anchor> {
        snapshot
            .anchors
            .iter()
            .filter(|anchor| self.accepts_href(&anchor.href))
            .map(|anchor| Anchor::new(anchor.text.trim(), anchor.href.as_str()))
            .filter(|anchor| {
                let len = anchor.text.chars().count();
                (len > 0 || self.keep_empty_text) && len < self.max_text_len
            })
            .collect()
    }

    fn accepts_href(&self, href: &str) -> bool {
        !href.is_empty() && self.markers.iter().any(|marker| href.contains(marker.as_str()))
    }
}

/// Links and spec URLs collected across pages
///
/// Links are unique by href and keep the first text seen for it.
#[derive(Debug, Default)]
pub struct LinkInventory {
    by_href: BTreeMap<String, String>,
    spec_urls: BTreeSet<String>,
}

impl LinkInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds anchors, returning how many hrefs were new
    pub fn add(&mut self, anchors: impl IntoIterator<Item = Anchor>) -> usize {
        let before = self.by_href.len();
        for anchor in anchors {
            self.by_href.entry(anchor.href).or_insert(anchor.text);
        }
        self.by_href.len() - before
    }

    /// Adds spec URLs, returning how many were new
    pub fn add_spec_urls(&mut self, urls: impl IntoIterator<Item = String>) -> usize {
        let before = self.spec_urls.len();
        self.spec_urls.extend(urls);
        self.spec_urls.len() - before
    }

    pub fn len(&self) -> usize {
        self.by_href.len()
    }

    pub fn spec_url_count(&self) -> usize {
        self.spec_urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_href.is_empty()
    }

    /// All links sorted by href, and all spec URLs sorted
    pub fn into_sorted(self) -> (Vec<Anchor>, Vec<String>) {
        let links = self
            .by_href
            .into_iter()
            .map(|(href, text)| Anchor { text, href })
            .collect();
        (links, self.spec_urls.into_iter().collect())
    }
}

//! Link inventory collection
//!
//! Visits a fixed list of index pages and gathers every documentation anchor
//! they contain, plus any OpenAPI document URLs written in their text. No
//! links are followed. A page that fails to load is logged and skipped.

use crate::config::CrawlerConfig;
use crate::crawler::driver::load_snapshot;
use crate::extract::{find_spec_urls, Anchor, LinkFilter, LinkInventory};
use crate::render::{open_session, release_session, PageHandle, SessionProvider};
use crate::{PageError, Result};

/// Result of a link collection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRun {
    /// Unique links sorted by href
    pub links: Vec<Anchor>,

    /// Unique spec document URLs found in page text, sorted
    pub spec_urls: Vec<String>,

    /// Pages that loaded and were scanned
    pub pages_scanned: usize,

    /// Pages that could not be loaded
    pub failures: Vec<PageError>,
}

/// Collects documentation links from index pages
pub struct LinkCollector {
    config: CrawlerConfig,
    filter: LinkFilter,
}

impl LinkCollector {
    pub fn new(config: CrawlerConfig, filter: LinkFilter) -> Self {
        Self { config, filter }
    }

    /// Acquires a session, scans `pages`, and releases the session
    pub async fn run<P: SessionProvider>(&self, provider: &P, pages: &[String]) -> Result<LinkRun> {
        let (session, mut page) = open_session(provider).await?;
        let run = self.collect(&mut page, pages).await;
        drop(page);
        release_session(session).await;
        Ok(run)
    }

    /// Scans `pages` in order on an already opened page
    pub async fn collect<H: PageHandle>(&self, page: &mut H, pages: &[String]) -> LinkRun {
        let mut inventory = LinkInventory::new();
        let mut run = LinkRun::default();

        for url in pages {
            match load_snapshot(page, url, &self.config).await {
                Ok(snapshot) => {
                    let added = inventory.add(self.filter.select(&snapshot));
                    let specs = inventory.add_spec_urls(find_spec_urls(&snapshot.body_text));
                    run.pages_scanned += 1;
                    tracing::info!(
                        "Scanned {}: {} new links ({} total), {} new spec URLs",
                        url,
                        added,
                        inventory.len(),
                        specs
                    );
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    run.failures.push(e);
                }
            }
        }

        let (links, spec_urls) = inventory.into_sorted();
        run.links = links;
        run.spec_urls = spec_urls;
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PageSnapshot;
    use crate::render::NavigateOptions;
    use crate::PageResult;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct IndexPages {
        pages: HashMap<String, Vec<Anchor>>,
        body_text: HashMap<String, String>,
        current: Option<String>,
    }

    #[async_trait]
    impl PageHandle for IndexPages {
        async fn navigate(&mut self, url: &str, _options: &NavigateOptions) -> PageResult<()> {
            if !self.pages.contains_key(url) {
                return Err(PageError::Navigation {
                    url: url.to_string(),
                    message: "HTTP 404".to_string(),
                });
            }
            self.current = Some(url.to_string());
            Ok(())
        }

        async fn snapshot(&mut self) -> PageResult<PageSnapshot> {
            let url = self.current.clone().unwrap_or_default();
            Ok(PageSnapshot {
                anchors: self.pages.get(&url).cloned().unwrap_or_default(),
                body_text: self.body_text.get(&url).cloned().unwrap_or_default(),
                url,
                ..Default::default()
            })
        }
    }

    fn collector() -> LinkCollector {
        let config = CrawlerConfig {
            settle_delay_ms: 0,
            ..Default::default()
        };
        LinkCollector::new(config, LinkFilter::new(vec!["/api-reference/".to_string()], 100))
    }

    #[tokio::test]
    async fn test_collect_dedupes_and_sorts() {
        let mut pages = HashMap::new();
        pages.insert(
            "https://docs.example.com/one".to_string(),
            vec![
                Anchor::new(" Zones ", "https://docs.example.com/api-reference/zones"),
                Anchor::new("Blog", "https://docs.example.com/blog"),
            ],
        );
        pages.insert(
            "https://docs.example.com/two".to_string(),
            vec![
                Anchor::new("Other text", "https://docs.example.com/api-reference/zones"),
                Anchor::new("Accounts", "https://docs.example.com/api-reference/accounts"),
            ],
        );
        let mut page = IndexPages {
            pages,
            body_text: HashMap::new(),
            current: None,
        };

        let run = collector()
            .collect(
                &mut page,
                &[
                    "https://docs.example.com/one".to_string(),
                    "https://docs.example.com/two".to_string(),
                ],
            )
            .await;

        assert_eq!(run.pages_scanned, 2);
        assert_eq!(
            run.links,
            vec![
                Anchor::new("Accounts", "https://docs.example.com/api-reference/accounts"),
                Anchor::new("Zones", "https://docs.example.com/api-reference/zones"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_page_is_skipped() {
        let mut pages = HashMap::new();
        pages.insert(
            "https://docs.example.com/ok".to_string(),
            vec![Anchor::new("Zones", "https://docs.example.com/api-reference/zones")],
        );
        let mut page = IndexPages {
            pages,
            body_text: HashMap::new(),
            current: None,
        };

        let run = collector()
            .collect(
                &mut page,
                &[
                    "https://docs.example.com/missing".to_string(),
                    "https://docs.example.com/ok".to_string(),
                ],
            )
            .await;

        assert_eq!(run.pages_scanned, 1);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].url(), "https://docs.example.com/missing");
        assert_eq!(run.links.len(), 1);
    }

    #[tokio::test]
    async fn test_collect_finds_spec_urls_in_text() {
        let mut pages = HashMap::new();
        pages.insert("https://docs.example.com/openapi".to_string(), vec![]);
        pages.insert("https://docs.example.com/other".to_string(), vec![]);
        let mut body_text = HashMap::new();
        body_text.insert(
            "https://docs.example.com/openapi".to_string(),
            "Core API\nhttps://docs.example.com/specs/core.json\nStream API\nhttps://docs.example.com/specs/stream.yaml"
                .to_string(),
        );
        body_text.insert(
            "https://docs.example.com/other".to_string(),
            "Mirror: https://docs.example.com/specs/core.json".to_string(),
        );
        let mut page = IndexPages {
            pages,
            body_text,
            current: None,
        };

        let run = collector()
            .collect(
                &mut page,
                &[
                    "https://docs.example.com/openapi".to_string(),
                    "https://docs.example.com/other".to_string(),
                ],
            )
            .await;

        assert_eq!(
            run.spec_urls,
            vec![
                "https://docs.example.com/specs/core.json".to_string(),
                "https://docs.example.com/specs/stream.yaml".to_string(),
            ]
        );
        assert!(run.links.is_empty());
    }
}

//! Static HTML backend
//!
//! Fetches pages over HTTP and snapshots the markup as served, without running
//! any scripts. Visible text is approximated from the DOM with line breaks at
//! block-level elements, and anchors are resolved against the final URL the
//! way a browser resolves `a.href`.

use crate::extract::{Anchor, PageSnapshot};
use crate::render::{NavigateOptions, PageHandle, RenderSession, SessionProvider};
use crate::{CatalogError, PageError, PageResult, Result};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start on a new line in rendered text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Provides HTTP client sessions
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    user_agent: Option<String>,
}

impl StaticProvider {
    pub fn new(user_agent: Option<String>) -> Self {
        Self { user_agent }
    }

    fn build_client(&self) -> std::result::Result<Client, reqwest::Error> {
        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("api-catalog/{}", env!("CARGO_PKG_VERSION")));

        Client::builder()
            .user_agent(user_agent)
            .connect_timeout(std::time::Duration::from_secs(10))
            .redirect(Policy::limited(10))
            .gzip(true)
            .brotli(true)
            .build()
    }
}

#[async_trait]
impl SessionProvider for StaticProvider {
    type Session = StaticSession;

    async fn acquire(&self) -> Result<StaticSession> {
        let client = self
            .build_client()
            .map_err(|e| CatalogError::SessionAcquisition(format!("HTTP client: {}", e)))?;
        Ok(StaticSession { client })
    }
}

/// A shared HTTP client
pub struct StaticSession {
    client: Client,
}

#[async_trait]
impl RenderSession for StaticSession {
    type Page = StaticPage;

    async fn open_page(&mut self) -> Result<StaticPage> {
        Ok(StaticPage {
            client: self.client.clone(),
            last_url: None,
            loaded: None,
        })
    }

    async fn release(self) -> Result<()> {
        Ok(())
    }
}

/// The most recently fetched document
pub struct StaticPage {
    client: Client,
    /// The last URL navigated to, whether or not it loaded
    last_url: Option<String>,
    loaded: Option<LoadedDocument>,
}

struct LoadedDocument {
    final_url: Url,
    body: String,
}

#[async_trait]
impl PageHandle for StaticPage {
    async fn navigate(&mut self, url: &str, options: &NavigateOptions) -> PageResult<()> {
        self.loaded = None;
        self.last_url = Some(url.to_string());

        let navigation_error = |message: String| PageError::Navigation {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, options, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(navigation_error(format!("HTTP {}", status.as_u16())));
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, options, e))?;

        self.loaded = Some(LoadedDocument { final_url, body });
        Ok(())
    }

    async fn snapshot(&mut self) -> PageResult<PageSnapshot> {
        let loaded = self.loaded.as_ref().ok_or_else(|| PageError::Extraction {
            url: self.last_url.clone().unwrap_or_default(),
            message: "no document loaded".to_string(),
        })?;
        Ok(snapshot_from_html(&loaded.body, &loaded.final_url))
    }
}

/// Maps a client error onto the page error taxonomy
fn classify_error(url: &str, options: &NavigateOptions, error: reqwest::Error) -> PageError {
    if error.is_timeout() {
        PageError::Timeout {
            url: url.to_string(),
            timeout: options.timeout,
        }
    } else if error.is_connect() {
        PageError::Navigation {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        PageError::Navigation {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Builds a page snapshot from raw HTML
///
/// # Example
///
/// ```
/// use api_catalog::render::snapshot_from_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Docs</title></head><body><h1>List</h1><a href="/b">Next</a></body></html>"#;
/// let base = Url::parse("https://docs.example.com/a").unwrap();
/// let snapshot = snapshot_from_html(html, &base);
/// assert_eq!(snapshot.heading.as_deref(), Some("List"));
/// assert_eq!(snapshot.anchors[0].href, "https://docs.example.com/b");
/// ```
pub fn snapshot_from_html(html: &str, base_url: &Url) -> PageSnapshot {
    let document = Html::parse_document(html);

    PageSnapshot {
        url: base_url.to_string(),
        title: select_text(&document, "title").unwrap_or_default(),
        heading: select_text(&document, "h1"),
        body_text: extract_body_text(&document),
        anchors: extract_anchors(&document, base_url),
    }
}

/// Text content of the first element matching `selector`
fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

fn extract_body_text(document: &Html) -> String {
    let mut text = String::new();
    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            push_visible_text(body, &mut text);
        }
    }
    text.trim().to_string()
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if HIDDEN_ELEMENTS.contains(&name) {
        return;
    }

    if name == "br" {
        out.push('\n');
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&name);
    if block && !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            push_visible_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }

    if block && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Every `<a>` in document order, with hrefs resolved against the page URL
fn extract_anchors(document: &Html, base_url: &Url) -> Vec<Anchor> {
    let Ok(selector) = Selector::parse("a") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| {
            let href = element
                .value()
                .attr("href")
                .and_then(|href| resolve_href(href, base_url))
                .unwrap_or_default();
            Anchor::new(element.text().collect::<String>(), href)
        })
        .collect()
}

/// Resolves an href the way the DOM's `a.href` does
fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    base_url.join(href.trim()).ok().map(|url| url.to_string())
}

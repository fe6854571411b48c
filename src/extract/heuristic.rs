//! Text heuristics for documentation pages that show one endpoint each

use crate::config::{defaults, CrawlerConfig};
use crate::extract::{Anchor, Extractor, HttpMethod, PageRecord, PageSnapshot};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A verb followed by whitespace and a path; the path runs to the next whitespace
    static ref ENDPOINT_PATTERN: Regex =
        Regex::new(r"(GET|POST|PUT|PATCH|DELETE|HEAD)\s+(/\S+)").expect("endpoint pattern is valid");
}

/// Link text a pagination anchor ends with
const NEXT_LABEL: &str = "Next";

/// Extractor for "one endpoint per page" API references
///
/// # Rules
///
/// - **Method/path**: the first `VERB /path` in the body text, verbs in
///   uppercase only
/// - **Title**: the trimmed `<h1>` text (possibly empty), else the document
///   title up to the separator when the page has no `<h1>`
/// - **Next link**: the first anchor whose trimmed text ends with "Next" and
///   whose target contains the section marker
#[derive(Debug, Clone)]
pub struct DocPageExtractor {
    next_link_marker: String,
    title_separator: String,
}

impl DocPageExtractor {
    pub fn new(next_link_marker: impl Into<String>, title_separator: impl Into<String>) -> Self {
        Self {
            next_link_marker: next_link_marker.into(),
            title_separator: title_separator.into(),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(&config.next_link_marker, &config.title_separator)
    }

    /// Finds the first documented endpoint in the text
    pub fn find_endpoint(text: &str) -> Option<(HttpMethod, String)> {
        let captures = ENDPOINT_PATTERN.captures(text)?;
        let method = captures.get(1)?.as_str().parse().ok()?;
        let path = captures.get(2)?.as_str().to_string();
        Some((method, path))
    }

    fn title(&self, snapshot: &PageSnapshot) -> String {
        match snapshot.heading.as_deref() {
            Some(heading) => heading.trim().to_string(),
            None => snapshot
                .title
                .split(self.title_separator.as_str())
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
        }
    }

    fn next_link<'a>(&self, anchors: &'a [Anchor]) -> Option<&'a Anchor> {
        anchors.iter().find(|anchor| {
            anchor.text.trim().ends_with(NEXT_LABEL) && anchor.href.contains(&self.next_link_marker)
        })
    }
}

impl Default for DocPageExtractor {
    fn default() -> Self {
        Self::new(defaults::NEXT_LINK_MARKER, defaults::TITLE_SEPARATOR)
    }
}

impl Extractor for DocPageExtractor {
    fn extract(&self, snapshot: &PageSnapshot) -> PageRecord {
        let (method, path) = match Self::find_endpoint(&snapshot.body_text) {
            Some((method, path)) => (Some(method), Some(path)),
            None => (None, None),
        };

        PageRecord {
            method,
            path,
            title: self.title(snapshot),
            url: snapshot.url.clone(),
            next_url: self.next_link(&snapshot.anchors).map(|a| a.href.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(body_text: &str) -> PageSnapshot {
        PageSnapshot {
            url: "https://docs.example.com/api-reference/core/list-pull-zones".to_string(),
            title: "List Pull Zones - Example Docs".to_string(),
            heading: Some("List Pull Zones".to_string()),
            body_text: body_text.to_string(),
            anchors: vec![],
        }
    }

    #[test]
    fn test_extracts_method_and_path() {
        let record = DocPageExtractor::default().extract(&snapshot(
            "Pull Zones\nGET /api-reference/pull-zones\nReturns the list",
        ));
        assert_eq!(record.method, Some(HttpMethod::Get));
        assert_eq!(record.path.as_deref(), Some("/api-reference/pull-zones"));
        assert_eq!(record.title, "List Pull Zones");
        assert!(record.is_valid());
    }

    #[test]
    fn test_first_match_wins() {
        let found = DocPageExtractor::find_endpoint("POST /a\nDELETE /b");
        assert_eq!(found, Some((HttpMethod::Post, "/a".to_string())));
    }

    #[test]
    fn test_path_stops_at_whitespace() {
        let found = DocPageExtractor::find_endpoint("PUT   /zones/{id}/edge-rules\tTry it");
        assert_eq!(found, Some((HttpMethod::Put, "/zones/{id}/edge-rules".to_string())));

        let found = DocPageExtractor::find_endpoint("HEAD\n/files/{path}\nmore");
        assert_eq!(found, Some((HttpMethod::Head, "/files/{path}".to_string())));
    }

    #[test]
    fn test_lowercase_verbs_ignored() {
        assert_eq!(DocPageExtractor::find_endpoint("get /a post /b"), None);
    }

    #[test]
    fn test_path_must_start_with_slash() {
        assert_eq!(DocPageExtractor::find_endpoint("GET pullzone"), None);
        assert_eq!(DocPageExtractor::find_endpoint("GET"), None);
    }

    #[test]
    fn test_no_match_yields_empty_method_and_path() {
        let record = DocPageExtractor::default().extract(&snapshot("Overview of the API"));
        assert_eq!(record.method, None);
        assert_eq!(record.path, None);
        assert!(!record.is_valid());
    }

    #[test]
    fn test_title_falls_back_to_document_title() {
        let mut page = snapshot("GET /a");
        page.heading = None;
        page.title = "  Purge URL - Example Docs - Reference".to_string();
        let record = DocPageExtractor::default().extract(&page);
        assert_eq!(record.title, "Purge URL");
    }

    #[test]
    fn test_blank_heading_gives_empty_title() {
        let mut page = snapshot("GET /a");
        page.heading = Some("   ".to_string());
        page.title = "Region List - Docs".to_string();
        let record = DocPageExtractor::default().extract(&page);
        assert_eq!(record.title, "");
    }

    #[test]
    fn test_heading_is_trimmed() {
        let mut page = snapshot("GET /a");
        page.heading = Some("\n  Get Statistics \n".to_string());
        let record = DocPageExtractor::default().extract(&page);
        assert_eq!(record.title, "Get Statistics");
    }

    #[test]
    fn test_next_link_requires_label_and_marker() {
        let mut page = snapshot("GET /a");
        page.anchors = vec![
            Anchor::new("Next", "https://docs.example.com/guides/next"),
            Anchor::new("Next steps", "https://docs.example.com/api-reference/steps"),
            Anchor::new("Previous", "https://docs.example.com/api-reference/prev"),
            Anchor::new("  Add Pull Zone\nNext  ", "https://docs.example.com/api-reference/add"),
            Anchor::new("Next", "https://docs.example.com/api-reference/later"),
        ];

        let record = DocPageExtractor::default().extract(&page);
        assert_eq!(
            record.next_url.as_deref(),
            Some("https://docs.example.com/api-reference/add")
        );
    }

    #[test]
    fn test_no_next_link() {
        let mut page = snapshot("GET /a");
        page.anchors = vec![Anchor::new("Home", "https://docs.example.com/")];
        let record = DocPageExtractor::default().extract(&page);
        assert_eq!(record.next_url, None);
    }

    #[test]
    fn test_custom_marker_and_separator() {
        let extractor = DocPageExtractor::new("/reference/", " | ");
        let page = PageSnapshot {
            url: "https://docs.example.com/reference/a".to_string(),
            title: "Create Key | Docs".to_string(),
            heading: None,
            body_text: "POST /keys".to_string(),
            anchors: vec![
                Anchor::new("Next", "https://docs.example.com/api-reference/b"),
                Anchor::new("Next", "https://docs.example.com/reference/b"),
            ],
        };

        let record = extractor.extract(&page);
        assert_eq!(record.title, "Create Key");
        assert_eq!(
            record.next_url.as_deref(),
            Some("https://docs.example.com/reference/b")
        );
    }

    #[test]
    fn test_record_url_comes_from_snapshot() {
        let page = snapshot("GET /a");
        let record = DocPageExtractor::default().extract(&page);
        assert_eq!(record.url, page.url);
    }
}

//! Page extraction
//!
//! A renderer turns a URL into a `PageSnapshot`: the handful of DOM facts the
//! heuristics need. An `Extractor` maps that snapshot to a `PageRecord`
//! without touching the page again, so alternate heuristics can be swapped in
//! without changing the crawl driver.

mod heuristic;
mod links;

pub use heuristic::DocPageExtractor;
pub use links::{find_spec_urls, LinkFilter, LinkInventory};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The DOM facts captured from a rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// Location of the page after any redirects
    pub url: String,

    /// Contents of the document `<title>`
    #[serde(default)]
    pub title: String,

    /// Text content of the first `<h1>`, if the page has one
    #[serde(default)]
    pub heading: Option<String>,

    /// Rendered, human-visible text of the body
    #[serde(default)]
    pub body_text: String,

    /// Every anchor on the page in document order
    #[serde(default)]
    pub anchors: Vec<Anchor>,
}

/// An anchor element with its resolved target
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    /// Visible text, untrimmed
    #[serde(default)]
    pub text: String,

    /// Absolute link target; empty when the anchor has no href
    #[serde(default)]
    pub href: String,
}

impl Anchor {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }
}

/// HTTP verbs recognised in documentation text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Parses an uppercase verb; matching is case-sensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            other => Err(format!("unsupported HTTP method: {}", other)),
        }
    }
}

/// Raw per-page extraction result, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecord {
    pub method: Option<HttpMethod>,
    pub path: Option<String>,
    pub title: String,
    pub url: String,
    pub next_url: Option<String>,
}

impl PageRecord {
    /// A record documents an endpoint only if both method and path were found
    pub fn is_valid(&self) -> bool {
        self.method.is_some() && self.path.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// The endpoint this record documents, if it is valid
    pub fn to_endpoint(&self) -> Option<Endpoint> {
        match (self.method, self.path.as_deref()) {
            (Some(method), Some(path)) if !path.is_empty() => Some(Endpoint {
                method,
                path: path.to_string(),
                title: self.title.clone(),
                url: self.url.clone(),
            }),
            _ => None,
        }
    }
}

/// A validated catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub title: String,
    pub url: String,
}

/// Strategy that turns a page snapshot into a record
pub trait Extractor: Send + Sync {
    fn extract(&self, snapshot: &PageSnapshot) -> PageRecord;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str_is_case_sensitive() {
        assert_eq!("GET".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!("DELETE".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert!("get".parse::<HttpMethod>().is_err());
        assert!("OPTIONS".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_record_without_path_is_invalid() {
        let record = PageRecord {
            method: Some(HttpMethod::Get),
            path: None,
            title: "List".to_string(),
            url: "https://docs.example.com/a".to_string(),
            next_url: None,
        };
        assert!(!record.is_valid());
        assert!(record.to_endpoint().is_none());
    }

    #[test]
    fn test_record_with_empty_path_is_invalid() {
        let record = PageRecord {
            method: Some(HttpMethod::Get),
            path: Some(String::new()),
            ..Default::default()
        };
        assert!(!record.is_valid());
        assert!(record.to_endpoint().is_none());
    }

    #[test]
    fn test_valid_record_drops_next_url() {
        let record = PageRecord {
            method: Some(HttpMethod::Post),
            path: Some("/purge".to_string()),
            title: "Purge URL".to_string(),
            url: "https://docs.example.com/purge".to_string(),
            next_url: Some("https://docs.example.com/next".to_string()),
        };

        let endpoint = record.to_endpoint().unwrap();
        assert_eq!(endpoint.method, HttpMethod::Post);
        assert_eq!(endpoint.path, "/purge");
        assert_eq!(endpoint.url, "https://docs.example.com/purge");
    }

    #[test]
    fn test_endpoint_serializes_uppercase_method() {
        let endpoint = Endpoint {
            method: HttpMethod::Patch,
            path: "/zones/{id}".to_string(),
            title: "Update Zone".to_string(),
            url: "https://docs.example.com/update".to_string(),
        };
        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["method"], "PATCH");
        assert_eq!(json["path"], "/zones/{id}");
    }

    #[test]
    fn test_snapshot_deserializes_script_result() {
        let json = r#"{
            "url": "https://docs.example.com/a",
            "title": "A - Docs",
            "heading": null,
            "bodyText": "GET /a",
            "anchors": [{"text": "B Next", "href": "https://docs.example.com/b"}]
        }"#;
        let snapshot: PageSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.body_text, "GET /a");
        assert_eq!(snapshot.heading, None);
        assert_eq!(snapshot.anchors.len(), 1);
    }
}

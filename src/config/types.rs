use crate::config::defaults;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for api-catalog
///
/// Every table is optional; missing values fall back to the built-in
/// documentation crawl.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub browser: BrowserConfig,
    pub output: OutputConfig,
    #[serde(rename = "section")]
    pub sections: Vec<SectionEntry>,
    pub links: LinksConfig,
}

impl Config {
    /// Returns the configured sections, or the built-in sections if none were given
    pub fn effective_sections(&self) -> Vec<SectionEntry> {
        if self.sections.is_empty() {
            defaults::sections()
        } else {
            self.sections.clone()
        }
    }

    /// All seed URLs in crawl order
    pub fn seeds(&self) -> Vec<String> {
        self.effective_sections()
            .into_iter()
            .flat_map(|section| section.seeds)
            .collect()
    }
}

/// Crawl engine limits and extraction heuristics
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of page visits per seed
    #[serde(rename = "max-pages-per-seed")]
    pub max_pages_per_seed: u32,

    /// Upper bound on a single page render (milliseconds)
    #[serde(rename = "render-timeout-ms")]
    pub render_timeout_ms: u64,

    /// Pause after rendering before the page is scraped (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// Path fragment a "Next" link must contain to be followed
    #[serde(rename = "next-link-marker")]
    pub next_link_marker: String,

    /// Separator splitting the site name off the document title
    #[serde(rename = "title-separator")]
    pub title_separator: String,

    /// Readiness condition the renderer waits for
    #[serde(rename = "wait-until")]
    pub wait_until: WaitUntil,
}

impl CrawlerConfig {
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages_per_seed: defaults::MAX_PAGES_PER_SEED,
            render_timeout_ms: defaults::RENDER_TIMEOUT_MS,
            settle_delay_ms: defaults::SETTLE_DELAY_MS,
            next_link_marker: defaults::NEXT_LINK_MARKER.to_string(),
            title_separator: defaults::TITLE_SEPARATOR.to_string(),
            wait_until: WaitUntil::default(),
        }
    }
}

/// When a navigation is considered complete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitUntil {
    /// The load event fired
    Load,
    /// The load event fired and in-flight network activity has drained
    #[default]
    NetworkIdle,
}

/// Which rendering backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrowserMode {
    /// Start a private headless browser for the run
    #[default]
    Launch,
    /// Attach to an already running browser over its DevTools websocket
    Connect,
    /// Fetch raw HTML over HTTP without executing scripts
    Static,
}

/// Rendering backend configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub mode: BrowserMode,

    /// DevTools websocket URL, required in `connect` mode
    #[serde(rename = "ws-url")]
    pub ws_url: Option<String>,

    /// Run a launched browser without a window
    pub headless: bool,

    /// User agent override
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            mode: BrowserMode::default(),
            ws_url: None,
            headless: true,
            user_agent: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where to write the JSON report; stdout when unset
    #[serde(rename = "json-path")]
    pub json_path: Option<String>,

    /// Where to write the markdown catalog; skipped when unset
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

/// A documentation section and the pages its traversal starts from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionEntry {
    /// Human readable section name (e.g., "core")
    pub name: String,

    /// First page of each "Next" chain in this section
    pub seeds: Vec<String>,
}

/// Link inventory configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Pages whose anchors are collected
    pub pages: Vec<String>,

    /// An anchor is kept when its href contains any of these
    pub markers: Vec<String>,

    /// Anchors with trimmed text at least this long are dropped
    #[serde(rename = "max-text-len")]
    pub max_text_len: usize,

    /// Keep matching anchors whose trimmed text is empty
    #[serde(rename = "keep-empty-text")]
    pub keep_empty_text: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            pages: defaults::link_pages(),
            markers: vec![defaults::NEXT_LINK_MARKER.to_string()],
            max_text_len: defaults::MAX_LINK_TEXT_LEN,
            keep_empty_text: false,
        }
    }
}

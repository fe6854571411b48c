//! Rendering sessions
//!
//! The crawl driver only sees three capabilities: acquire a session, open a
//! page in it, and release it. A page can be navigated and snapshotted.
//!
//! Two backends are provided:
//! - `chrome`: a headless Chrome driven over the DevTools protocol, either
//!   launched for the run or attached to a running browser
//! - `static_html`: plain HTTP fetches parsed with `scraper`, for sites that
//!   render server-side

mod chrome;
mod static_html;

pub use chrome::{ChromePage, ChromeProvider, ChromeSession};
pub use static_html::{snapshot_from_html, StaticPage, StaticProvider, StaticSession};

use crate::config::{CrawlerConfig, WaitUntil};
use crate::extract::PageSnapshot;
use crate::{PageResult, Result};
use async_trait::async_trait;
use std::time::Duration;

/// How a navigation should be bounded and when it is considered done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    pub timeout: Duration,
    pub wait_until: WaitUntil,
}

impl NavigateOptions {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            timeout: config.render_timeout(),
            wait_until: config.wait_until,
        }
    }
}

/// Hands out rendering sessions
///
/// Failing to acquire a session is the only fatal error of a run.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: RenderSession;

    async fn acquire(&self) -> Result<Self::Session>;
}

/// An acquired rendering session (a browser or an HTTP client)
#[async_trait]
pub trait RenderSession: Send {
    type Page: PageHandle;

    /// Opens the page all navigation of the run happens in
    async fn open_page(&mut self) -> Result<Self::Page>;

    /// Gives the session back; called exactly once per acquired session
    async fn release(self) -> Result<()>;
}

/// A single page that is navigated from URL to URL
#[async_trait]
pub trait PageHandle: Send {
    /// Loads `url` and waits for it per `options`
    async fn navigate(&mut self, url: &str, options: &NavigateOptions) -> PageResult<()>;

    /// Captures the DOM facts of the currently loaded page
    async fn snapshot(&mut self) -> PageResult<PageSnapshot>;
}

/// Acquires a session and opens the page the run will use
///
/// If the page cannot be opened, the session is released before the error is
/// returned.
pub async fn open_session<P: SessionProvider>(
    provider: &P,
) -> Result<(P::Session, <P::Session as RenderSession>::Page)> {
    let mut session = provider.acquire().await?;
    match session.open_page().await {
        Ok(page) => Ok((session, page)),
        Err(e) => {
            release_session(session).await;
            Err(e)
        }
    }
}

/// Releases a session, logging rather than propagating failures
pub async fn release_session<S: RenderSession>(session: S) {
    if let Err(e) = session.release().await {
        tracing::warn!("Failed to release rendering session: {}", e);
    }
}

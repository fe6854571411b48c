//! Headless Chrome backend
//!
//! Launches a private browser or attaches to a running one through its
//! DevTools websocket. The CDP event handler must be polled for the browser to
//! make progress, so it runs on its own task for the session's lifetime.

use crate::config::{BrowserConfig, BrowserMode, WaitUntil};
use crate::extract::PageSnapshot;
use crate::render::{NavigateOptions, PageHandle, RenderSession, SessionProvider};
use crate::{CatalogError, PageError, PageResult, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

/// Collects everything the extractors need in one round trip
const SNAPSHOT_SCRIPT: &str = r#"(() => {
  const h1 = document.querySelector('h1');
  return {
    url: window.location.href,
    title: document.title || '',
    heading: h1 ? h1.textContent : null,
    bodyText: (document.body && document.body.innerText) || '',
    anchors: Array.from(document.querySelectorAll('a')).map(a => ({
      text: a.textContent || '',
      href: a.href || ''
    }))
  };
})()"#;

/// Lifecycle events that mark a quiet network: at most two connections
/// (`networkAlmostIdle`) or none (`networkIdle`) for 500 ms
const NETWORK_IDLE_EVENTS: &[&str] = &["networkAlmostIdle", "networkIdle"];

/// Provides Chrome sessions according to the browser configuration
#[derive(Debug, Clone)]
pub struct ChromeProvider {
    config: BrowserConfig,
}

impl ChromeProvider {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    async fn launch(&self) -> Result<(Browser, chromiumoxide::Handler)> {
        let mut builder = LaunchConfig::builder();
        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(user_agent) = &self.config.user_agent {
            builder = builder.arg(format!("--user-agent={}", user_agent));
        }
        let launch_config = builder.build().map_err(CatalogError::SessionAcquisition)?;

        Browser::launch(launch_config)
            .await
            .map_err(|e| CatalogError::SessionAcquisition(format!("launch failed: {}", e)))
    }

    async fn connect(&self) -> Result<(Browser, chromiumoxide::Handler)> {
        let ws_url = self.config.ws_url.as_deref().ok_or_else(|| {
            CatalogError::SessionAcquisition("no DevTools websocket URL configured".to_string())
        })?;

        Browser::connect(ws_url)
            .await
            .map_err(|e| CatalogError::SessionAcquisition(format!("connect to {} failed: {}", ws_url, e)))
    }
}

#[async_trait]
impl SessionProvider for ChromeProvider {
    type Session = ChromeSession;

    async fn acquire(&self) -> Result<ChromeSession> {
        let owned = self.config.mode != BrowserMode::Connect;
        let (browser, mut handler) = if owned {
            tracing::info!("Launching headless browser");
            self.launch().await?
        } else {
            tracing::info!("Attaching to running browser");
            self.connect().await?
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {}", e);
                }
            }
        });

        Ok(ChromeSession {
            browser,
            handler,
            owned,
        })
    }
}

/// A launched or attached browser
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    /// Launched by us, so closing it on release is ours to do
    owned: bool,
}

#[async_trait]
impl RenderSession for ChromeSession {
    type Page = ChromePage;

    async fn open_page(&mut self) -> Result<ChromePage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| CatalogError::Session(format!("failed to open page: {}", e)))?;
        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .map_err(|e| CatalogError::Session(format!("failed to enable lifecycle events: {}", e)))?;
        Ok(ChromePage { page })
    }

    async fn release(mut self) -> Result<()> {
        let closed = if self.owned {
            let closed = self
                .browser
                .close()
                .await
                .map(|_| ())
                .map_err(|e| CatalogError::Session(format!("failed to close browser: {}", e)));
            if closed.is_ok() {
                match self.browser.wait().await {
                    Ok(status) => tracing::debug!("Browser exited: {:?}", status),
                    Err(e) => tracing::debug!("Waiting for browser exit failed: {}", e),
                }
            }
            closed
        } else {
            tracing::debug!("Detaching from browser");
            Ok(())
        };

        self.handler.abort();
        closed
    }
}

/// A browser tab
pub struct ChromePage {
    page: Page,
}

#[async_trait]
impl PageHandle for ChromePage {
    async fn navigate(&mut self, url: &str, options: &NavigateOptions) -> PageResult<()> {
        let navigation_error = |e: chromiumoxide::error::CdpError| PageError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        };

        if options.wait_until == WaitUntil::Load {
            self.page.goto(url).await.map_err(navigation_error)?;
            return Ok(());
        }

        // Subscribe before navigating so no lifecycle event is missed. The
        // caller bounds the whole wait with the render timeout.
        let mut events = self
            .page
            .event_listener::<EventLifecycleEvent>()
            .await
            .map_err(navigation_error)?;
        let main_frame = self
            .page
            .mainframe()
            .await
            .ok()
            .flatten()
            .map(|frame| frame.as_ref().to_string());

        self.page.goto(url).await.map_err(navigation_error)?;

        let mut watcher = IdleWatcher::new(main_frame);
        while let Some(event) = events.next().await {
            if watcher.observe(event.frame_id.as_ref(), event.loader_id.as_ref(), &event.name) {
                return Ok(());
            }
        }

        tracing::debug!("Lifecycle events ended before {} went idle", url);
        Ok(())
    }

    async fn snapshot(&mut self) -> PageResult<PageSnapshot> {
        let current_url = self.page.url().await.ok().flatten().unwrap_or_default();
        let extraction_error = |message: String| PageError::Extraction {
            url: current_url.clone(),
            message,
        };

        let params = EvaluateParams::builder()
            .expression(SNAPSHOT_SCRIPT)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(&extraction_error)?;

        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| extraction_error(e.to_string()))?;

        result
            .into_value::<PageSnapshot>()
            .map_err(|e| extraction_error(format!("unexpected snapshot shape: {}", e)))
    }
}

/// Tracks lifecycle events until the main frame's newest document is idle
///
/// Only events from a document whose `init` was seen after subscribing count,
/// so idle events left over from the previous page are ignored.
#[derive(Debug)]
struct IdleWatcher {
    main_frame: Option<String>,
    loader: Option<String>,
}

impl IdleWatcher {
    fn new(main_frame: Option<String>) -> Self {
        Self {
            main_frame,
            loader: None,
        }
    }

    /// Records one event, returning true once the network is idle
    fn observe(&mut self, frame_id: &str, loader_id: &str, name: &str) -> bool {
        if let Some(main_frame) = &self.main_frame {
            if main_frame != frame_id {
                return false;
            }
        }

        if name == "init" {
            self.loader = Some(loader_id.to_string());
            return false;
        }

        NETWORK_IDLE_EVENTS.contains(&name) && self.loader.as_deref() == Some(loader_id)
    }
}

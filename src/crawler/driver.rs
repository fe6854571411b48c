//! Crawl driver - seed-by-seed traversal of "Next" chains
//!
//! This module contains the main crawl loop. For each seed, in order, it:
//! - Asks the frontier whether the next URL may be visited
//! - Renders the page and waits for it to settle
//! - Runs the extractor and records valid endpoints
//! - Follows the page's "Next" link
//!
//! A page that fails to render or extract ends only its own seed's traversal.
//! All seeds share one page, so they are processed strictly one at a time.

use crate::config::CrawlerConfig;
use crate::crawler::frontier::{Admission, Frontier};
use crate::extract::{DocPageExtractor, Endpoint, Extractor, PageRecord, PageSnapshot};
use crate::render::{open_session, release_session, NavigateOptions, PageHandle, SessionProvider};
use crate::state::{CrawlState, SeedOutcome};
use crate::{PageError, PageResult, Result};

/// How one seed's traversal went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// The seed URL
    pub seed: String,

    /// Visit attempts made, successful or not
    pub pages_visited: u32,

    /// Endpoints this seed contributed
    pub endpoints_found: usize,

    /// Why the traversal ended
    pub outcome: SeedOutcome,
}

/// Everything a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlRun {
    /// Endpoints in discovery order
    pub endpoints: Vec<Endpoint>,

    /// One report per seed, in seed order
    pub seeds: Vec<SeedReport>,
}

impl CrawlRun {
    pub fn pages_visited(&self) -> u32 {
        self.seeds.iter().map(|s| s.pages_visited).sum()
    }

    pub fn seeds_completed(&self) -> usize {
        self.seeds.iter().filter(|s| s.outcome.is_completed()).count()
    }

    pub fn seeds_terminated(&self) -> usize {
        self.seeds.iter().filter(|s| s.outcome.is_terminated()).count()
    }
}

/// Main crawl driver structure
pub struct CrawlDriver {
    config: CrawlerConfig,
    extractor: Box<dyn Extractor>,
}

impl CrawlDriver {
    /// Creates a driver using the documentation page heuristics
    pub fn new(config: CrawlerConfig) -> Self {
        let extractor = DocPageExtractor::from_config(&config);
        Self::with_extractor(config, Box::new(extractor))
    }

    /// Creates a driver with a custom extraction strategy
    pub fn with_extractor(config: CrawlerConfig, extractor: Box<dyn Extractor>) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Runs a complete crawl
    ///
    /// The rendering session is acquired once, shared by every seed, and
    /// released before returning. Only failing to obtain the session is an
    /// error; page failures are reported per seed in the returned run.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use api_catalog::config::CrawlerConfig;
    /// use api_catalog::crawler::CrawlDriver;
    /// use api_catalog::render::StaticProvider;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let driver = CrawlDriver::new(CrawlerConfig::default());
    /// let seeds = vec!["https://docs.example.com/api-reference/list".to_string()];
    /// let run = driver.run(&StaticProvider::default(), &seeds).await?;
    /// println!("{} endpoints", run.endpoints.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<P: SessionProvider>(&self, provider: &P, seeds: &[String]) -> Result<CrawlRun> {
        let (session, mut page) = open_session(provider).await?;
        let run = self.crawl_seeds(&mut page, seeds).await;
        drop(page);
        release_session(session).await;
        Ok(run)
    }

    /// Walks every seed's chain on an already opened page
    pub async fn crawl_seeds<H: PageHandle>(&self, page: &mut H, seeds: &[String]) -> CrawlRun {
        let mut frontier = Frontier::new(self.config.max_pages_per_seed);
        let mut run = CrawlRun::default();
        let start_time = std::time::Instant::now();

        tracing::info!("Starting crawl of {} seeds", seeds.len());

        for (index, seed) in seeds.iter().enumerate() {
            tracing::info!("Seed {}/{}: {}", index + 1, seeds.len(), seed);
            let report = self
                .crawl_seed(page, seed, &mut frontier, &mut run.endpoints)
                .await;

            match &report.outcome {
                SeedOutcome::Completed(reason) => tracing::info!(
                    "Seed {} finished ({}): {} pages, {} endpoints",
                    seed,
                    reason,
                    report.pages_visited,
                    report.endpoints_found
                ),
                SeedOutcome::Terminated(error) => tracing::warn!(
                    "Seed {} stopped early after {} pages, {} endpoints: {}",
                    seed,
                    report.pages_visited,
                    report.endpoints_found,
                    error
                ),
            }

            run.seeds.push(report);
        }

        tracing::info!(
            "Crawl completed: {} endpoints from {} pages in {:?}",
            run.endpoints.len(),
            frontier.visited().len(),
            start_time.elapsed()
        );

        run
    }

    /// Follows one seed's chain until the frontier or an error stops it
    async fn crawl_seed<H: PageHandle>(
        &self,
        page: &mut H,
        seed: &str,
        frontier: &mut Frontier,
        endpoints: &mut Vec<Endpoint>,
    ) -> SeedReport {
        let mut budget = frontier.budget();
        let mut state = CrawlState::Start;
        let mut candidate = Some(seed.to_string());
        let mut endpoints_found = 0;

        let outcome = loop {
            let url = match frontier.admit(candidate.as_deref(), &mut budget) {
                Admission::Visit(url) => url,
                Admission::Stop(reason) => {
                    advance(&mut state, CrawlState::Done);
                    break SeedOutcome::Completed(reason);
                }
            };

            advance(&mut state, CrawlState::Rendering);
            tracing::debug!("Rendering {}", url);
            if let Err(error) = render_and_settle(page, &url, &self.config).await {
                advance(&mut state, CrawlState::Done);
                break SeedOutcome::Terminated(error);
            }

            advance(&mut state, CrawlState::Extracting);
            let record = match self.extract(page).await {
                Ok(record) => record,
                Err(error) => {
                    advance(&mut state, CrawlState::Done);
                    break SeedOutcome::Terminated(error);
                }
            };

            advance(&mut state, CrawlState::Deciding);
            match record.to_endpoint() {
                Some(endpoint) => {
                    tracing::debug!("Found {} {} ({})", endpoint.method, endpoint.path, endpoint.title);
                    endpoints.push(endpoint);
                    endpoints_found += 1;
                }
                None => tracing::debug!("No endpoint documented on {}", record.url),
            }

            candidate = record.next_url;
        };

        SeedReport {
            seed: seed.to_string(),
            pages_visited: budget.used(),
            endpoints_found,
            outcome,
        }
    }

    async fn extract<H: PageHandle>(&self, page: &mut H) -> PageResult<PageRecord> {
        let snapshot = page.snapshot().await?;
        Ok(self.extractor.extract(&snapshot))
    }
}

/// Steps the traversal state machine
fn advance(state: &mut CrawlState, next: CrawlState) {
    debug_assert!(
        state.can_transition_to(next),
        "invalid transition {} -> {}",
        state,
        next
    );
    tracing::trace!("{} -> {}", state, next);
    *state = next;
}

/// Navigates with a bounded wait, then pauses for client-side rendering
pub(crate) async fn render_and_settle<H: PageHandle>(
    page: &mut H,
    url: &str,
    config: &CrawlerConfig,
) -> PageResult<()> {
    let options = NavigateOptions::from_config(config);

    match tokio::time::timeout(options.timeout, page.navigate(url, &options)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(PageError::Timeout {
                url: url.to_string(),
                timeout: options.timeout,
            })
        }
    }

    let settle_delay = config.settle_delay();
    if !settle_delay.is_zero() {
        tokio::time::sleep(settle_delay).await;
    }

    Ok(())
}

/// Renders a page and returns its snapshot
pub(crate) async fn load_snapshot<H: PageHandle>(
    page: &mut H,
    url: &str,
    config: &CrawlerConfig,
) -> PageResult<PageSnapshot> {
    render_and_settle(page, url, config).await?;
    page.snapshot().await
}

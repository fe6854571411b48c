//! api-catalog main entry point
//!
//! This is the command-line interface for the API endpoint cataloguer.

use anyhow::Context;
use api_catalog::config::{load_config_with_hash, BrowserMode, Config};
use api_catalog::crawler::{CrawlDriver, LinkCollector};
use api_catalog::extract::LinkFilter;
use api_catalog::output::{
    generate_markdown_catalog, log_statistics, CatalogInfo, CrawlReport, JsonReporter, LinkReport,
    Report, Reporter, RunStatistics,
};
use api_catalog::render::{ChromeProvider, SessionProvider, StaticProvider};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// api-catalog: an API endpoint cataloguer
///
/// Walks "Next"-linked API reference pages from a list of seeds, scrapes the
/// HTTP method, path and title each page documents, and prints the catalog as
/// JSON on stdout.
#[derive(Parser, Debug)]
#[command(name = "api-catalog")]
#[command(version = "1.0.0")]
#[command(about = "Catalogs API endpoints from paginated documentation", long_about = None)]
struct Cli {
    /// Path to a TOML file overriding the built-in settings
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Collect the documentation link inventory instead of endpoints
    #[arg(long)]
    links: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "links")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    match config.browser.mode {
        BrowserMode::Static => {
            let provider = StaticProvider::new(config.browser.user_agent.clone());
            dispatch(&provider, &config, config_hash, cli.links).await
        }
        BrowserMode::Launch | BrowserMode::Connect => {
            let provider = ChromeProvider::new(config.browser.clone());
            dispatch(&provider, &config, config_hash, cli.links).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the JSON report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("api_catalog=info,warn"),
            1 => EnvFilter::new("api_catalog=debug,info"),
            2 => EnvFilter::new("api_catalog=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== api-catalog Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages per seed: {}", config.crawler.max_pages_per_seed);
    println!("  Render timeout: {}ms", config.crawler.render_timeout_ms);
    println!("  Settle delay: {}ms", config.crawler.settle_delay_ms);
    println!("  Next link marker: {}", config.crawler.next_link_marker);
    println!("  Title separator: {:?}", config.crawler.title_separator);
    println!("  Wait until: {:?}", config.crawler.wait_until);

    println!("\nBrowser:");
    println!("  Mode: {:?}", config.browser.mode);
    if let Some(ws_url) = &config.browser.ws_url {
        println!("  DevTools URL: {}", ws_url);
    }
    println!("  Headless: {}", config.browser.headless);
    if let Some(user_agent) = &config.browser.user_agent {
        println!("  User agent: {}", user_agent);
    }

    println!("\nOutput:");
    println!(
        "  JSON: {}",
        config.output.json_path.as_deref().unwrap_or("<stdout>")
    );
    if let Some(summary_path) = &config.output.summary_path {
        println!("  Summary: {}", summary_path);
    }

    let sections = config.effective_sections();
    println!("\nSections ({}):", sections.len());
    for section in &sections {
        println!("  - {} ({} seeds)", section.name, section.seeds.len());
        for seed in &section.seeds {
            println!("    * {}", seed);
        }
    }

    println!("\nLink Pages ({}):", config.links.pages.len());
    for page in &config.links.pages {
        println!("  - {}", page);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        sections.iter().map(|s| s.seeds.len()).sum::<usize>()
    );
}

async fn dispatch<P: SessionProvider>(
    provider: &P,
    config: &Config,
    config_hash: Option<String>,
    links: bool,
) -> anyhow::Result<()> {
    if links {
        handle_links(provider, config).await
    } else {
        handle_crawl(provider, config, config_hash).await
    }
}

/// Handles the main crawl operation
async fn handle_crawl<P: SessionProvider>(
    provider: &P,
    config: &Config,
    config_hash: Option<String>,
) -> anyhow::Result<()> {
    let seeds = config.seeds();
    tracing::info!(
        "Crawling {} sections, {} seed URLs",
        config.effective_sections().len(),
        seeds.len()
    );

    let driver = CrawlDriver::new(config.crawler.clone());
    let run = match driver.run(provider, &seeds).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    log_statistics(&RunStatistics::from_run(&run));

    let report = Report::from(CrawlReport::from_run(&run));
    JsonReporter::from_path(config.output.json_path.as_deref()).emit(&report)?;

    if let Some(summary_path) = &config.output.summary_path {
        generate_markdown_catalog(&run, &CatalogInfo::now(config_hash), Path::new(summary_path))?;
    }

    Ok(())
}

/// Handles the --links mode: builds the documentation link inventory
async fn handle_links<P: SessionProvider>(provider: &P, config: &Config) -> anyhow::Result<()> {
    tracing::info!("Collecting links from {} pages", config.links.pages.len());

    let collector = LinkCollector::new(config.crawler.clone(), LinkFilter::from_config(&config.links));
    let run = match collector.run(provider, &config.links.pages).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("Link collection failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Found {} unique links and {} spec URLs on {} pages ({} failed)",
        run.links.len(),
        run.spec_urls.len(),
        run.pages_scanned,
        run.failures.len()
    );

    let report = Report::from(LinkReport::from_run(&run));
    JsonReporter::from_path(config.output.json_path.as_deref()).emit(&report)?;

    Ok(())
}

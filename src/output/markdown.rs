//! Markdown catalog generation
//!
//! This module renders a finished crawl as a human-readable markdown catalog:
//! run information, per-seed outcomes, and the endpoint table.

use crate::crawler::CrawlRun;
use crate::output::stats::RunStatistics;
use crate::output::traits::OutputResult;
use crate::state::SeedOutcome;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Metadata shown at the top of the catalog
#[derive(Debug, Clone)]
pub struct CatalogInfo {
    pub generated_at: DateTime<Utc>,
    pub config_hash: Option<String>,
}

impl CatalogInfo {
    pub fn now(config_hash: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            config_hash,
        }
    }
}

/// Writes the markdown catalog for `run` to `output_path`
pub fn generate_markdown_catalog(
    run: &CrawlRun,
    info: &CatalogInfo,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_catalog(run, info);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Catalog written to {}", output_path.display());
    Ok(())
}

/// Formats a crawl as markdown
pub fn format_markdown_catalog(run: &CrawlRun, info: &CatalogInfo) -> String {
    let stats = RunStatistics::from_run(run);
    let mut md = String::new();

    md.push_str("# API Endpoint Catalog\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        info.generated_at.to_rfc3339()
    ));
    if let Some(hash) = &info.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push_str(&format!("- **Seeds**: {}\n", stats.seeds));
    md.push_str(&format!("- **Pages Visited**: {}\n", stats.pages_visited));
    md.push_str(&format!("- **Endpoints**: {}\n\n", stats.total_endpoints));

    if !stats.endpoints_by_method.is_empty() {
        md.push_str("| Method | Count |\n");
        md.push_str("|--------|-------|\n");
        for (method, count) in &stats.endpoints_by_method {
            md.push_str(&format!("| {} | {} |\n", method, count));
        }
        md.push('\n');
    }

    // Seed outcomes
    if !run.seeds.is_empty() {
        md.push_str("## Seeds\n\n");
        md.push_str("| Seed | Pages | Endpoints | Outcome |\n");
        md.push_str("|------|-------|-----------|---------|\n");
        for seed in &run.seeds {
            let outcome = match &seed.outcome {
                SeedOutcome::Completed(reason) => reason.as_str().replace('_', " "),
                SeedOutcome::Terminated(error) => format!("error: {}", escape_cell(&error.to_string())),
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                seed.seed, seed.pages_visited, seed.endpoints_found, outcome
            ));
        }
        md.push('\n');
    }

    // Endpoints in discovery order
    md.push_str("## Endpoints\n\n");
    if run.endpoints.is_empty() {
        md.push_str("No endpoints found.\n");
    } else {
        md.push_str("| Method | Path | Title |\n");
        md.push_str("|--------|------|-------|\n");
        for endpoint in &run.endpoints {
            md.push_str(&format!(
                "| {} | `{}` | [{}]({}) |\n",
                endpoint.method,
                endpoint.path,
                escape_cell(&endpoint.title),
                endpoint.url
            ));
        }
    }

    md
}

/// Keeps free text from breaking a table row
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::SeedReport;
    use crate::extract::{Endpoint, HttpMethod};
    use crate::state::StopReason;
    use crate::PageError;
    use tempfile::TempDir;

    fn create_test_run() -> CrawlRun {
        CrawlRun {
            endpoints: vec![Endpoint {
                method: HttpMethod::Get,
                path: "/pullzone".to_string(),
                title: "List Pull Zones".to_string(),
                url: "https://docs.example.com/api-reference/list".to_string(),
            }],
            seeds: vec![
                SeedReport {
                    seed: "https://docs.example.com/api-reference/list".to_string(),
                    pages_visited: 1,
                    endpoints_found: 1,
                    outcome: SeedOutcome::Completed(StopReason::EndOfChain),
                },
                SeedReport {
                    seed: "https://docs.example.com/api-reference/broken".to_string(),
                    pages_visited: 1,
                    endpoints_found: 0,
                    outcome: SeedOutcome::Terminated(PageError::Navigation {
                        url: "https://docs.example.com/api-reference/broken".to_string(),
                        message: "HTTP 404".to_string(),
                    }),
                },
            ],
        }
    }

    fn test_info() -> CatalogInfo {
        CatalogInfo {
            generated_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            config_hash: Some("abc123".to_string()),
        }
    }

    #[test]
    fn test_format_markdown_catalog() {
        let markdown = format_markdown_catalog(&create_test_run(), &test_info());

        assert!(markdown.contains("# API Endpoint Catalog"));
        assert!(markdown.contains("2024-01-01T00:00:00+00:00"));
        assert!(markdown.contains("- **Config Hash**: abc123"));
        assert!(markdown.contains("| GET | `/pullzone` | [List Pull Zones](https://docs.example.com/api-reference/list) |"));
    }

    #[test]
    fn test_markdown_seed_outcomes() {
        let markdown = format_markdown_catalog(&create_test_run(), &test_info());

        assert!(markdown.contains("| https://docs.example.com/api-reference/list | 1 | 1 | end of chain |"));
        assert!(markdown.contains("error: Navigation to"));
        assert!(markdown.contains("HTTP 404"));
    }

    #[test]
    fn test_markdown_empty_run() {
        let markdown = format_markdown_catalog(&CrawlRun::default(), &test_info());
        assert!(markdown.contains("No endpoints found."));
        assert!(!markdown.contains("## Seeds"));
    }

    #[test]
    fn test_generate_markdown_catalog_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.md");

        generate_markdown_catalog(&create_test_run(), &test_info(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# API Endpoint Catalog"));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a | b\nc"), "a \\| b c");
    }
}

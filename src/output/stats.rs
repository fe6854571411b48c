//! Run statistics
//!
//! This module derives summary figures from a finished crawl and logs them.

use crate::crawler::CrawlRun;
use crate::extract::HttpMethod;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Number of seeds processed
    pub seeds: usize,

    /// Seeds whose chain ended normally
    pub seeds_completed: usize,

    /// Seeds cut short by a page error
    pub seeds_terminated: usize,

    /// Page visits across all seeds
    pub pages_visited: u32,

    /// Endpoints reported
    pub total_endpoints: usize,

    /// Endpoint count per HTTP method
    pub endpoints_by_method: BTreeMap<&'static str, usize>,
}

impl RunStatistics {
    pub fn from_run(run: &CrawlRun) -> Self {
        let mut endpoints_by_method = BTreeMap::new();
        for endpoint in &run.endpoints {
            *endpoints_by_method.entry(endpoint.method.as_str()).or_insert(0) += 1;
        }

        Self {
            seeds: run.seeds.len(),
            seeds_completed: run.seeds_completed(),
            seeds_terminated: run.seeds_terminated(),
            pages_visited: run.pages_visited(),
            total_endpoints: run.endpoints.len(),
            endpoints_by_method,
        }
    }

    pub fn count_for(&self, method: HttpMethod) -> usize {
        self.endpoints_by_method
            .get(method.as_str())
            .copied()
            .unwrap_or(0)
    }

    /// Share of visited pages that documented an endpoint, as a percentage
    pub fn yield_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            return 0.0;
        }
        (self.total_endpoints as f64 / self.pages_visited as f64) * 100.0
    }
}

/// Logs statistics at info level
pub fn log_statistics(stats: &RunStatistics) {
    tracing::info!(
        "Seeds: {} ({} completed, {} terminated)",
        stats.seeds,
        stats.seeds_completed,
        stats.seeds_terminated
    );
    tracing::info!(
        "Pages visited: {}, endpoints: {} ({:.1}% yield)",
        stats.pages_visited,
        stats.total_endpoints,
        stats.yield_rate()
    );
    for (method, count) in &stats.endpoints_by_method {
        tracing::info!("  {}: {}", method, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::SeedReport;
    use crate::extract::Endpoint;
    use crate::state::{SeedOutcome, StopReason};
    use crate::PageError;

    fn endpoint(method: HttpMethod, path: &str) -> Endpoint {
        Endpoint {
            method,
            path: path.to_string(),
            title: path.to_string(),
            url: format!("https://docs.example.com/api-reference{}", path),
        }
    }

    fn test_run() -> CrawlRun {
        CrawlRun {
            endpoints: vec![
                endpoint(HttpMethod::Get, "/pullzone"),
                endpoint(HttpMethod::Post, "/pullzone"),
                endpoint(HttpMethod::Get, "/storagezone"),
            ],
            seeds: vec![
                SeedReport {
                    seed: "https://docs.example.com/a".to_string(),
                    pages_visited: 3,
                    endpoints_found: 2,
                    outcome: SeedOutcome::Completed(StopReason::EndOfChain),
                },
                SeedReport {
                    seed: "https://docs.example.com/b".to_string(),
                    pages_visited: 1,
                    endpoints_found: 1,
                    outcome: SeedOutcome::Terminated(PageError::Navigation {
                        url: "https://docs.example.com/c".to_string(),
                        message: "HTTP 500".to_string(),
                    }),
                },
            ],
        }
    }

    #[test]
    fn test_statistics_from_run() {
        let stats = RunStatistics::from_run(&test_run());

        assert_eq!(stats.seeds, 2);
        assert_eq!(stats.seeds_completed, 1);
        assert_eq!(stats.seeds_terminated, 1);
        assert_eq!(stats.pages_visited, 4);
        assert_eq!(stats.total_endpoints, 3);
        assert_eq!(stats.count_for(HttpMethod::Get), 2);
        assert_eq!(stats.count_for(HttpMethod::Delete), 0);
    }

    #[test]
    fn test_yield_rate() {
        let stats = RunStatistics::from_run(&test_run());
        assert!((stats.yield_rate() - 75.0).abs() < 0.01);
    }

    #[test]
    fn test_yield_rate_zero_pages() {
        let stats = RunStatistics::from_run(&CrawlRun::default());
        assert_eq!(stats.yield_rate(), 0.0);
    }
}

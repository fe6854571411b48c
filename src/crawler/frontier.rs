//! Frontier tracking for "Next"-link traversals
//!
//! This module handles:
//! - The run-wide set of visited URLs
//! - Per-seed page budgets
//! - Deciding whether a candidate URL is visited next
//!
//! The frontier is a single candidate per step (the page's "Next" link), not a
//! queue. A URL is marked visited before it is rendered, so converging or
//! cyclic chains can never render the same page twice.

use crate::state::StopReason;
use std::collections::HashSet;

/// URLs visited during one run
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Records a URL, returning false if it was already present
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Remaining page visits for one seed
///
/// Every visit attempt consumes one unit, whether or not the page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlBudget {
    limit: u32,
    remaining: u32,
}

impl CrawlBudget {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Visits consumed so far
    pub fn used(&self) -> u32 {
        self.limit - self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Consumes one visit, returning false if none were left
    pub fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Result of offering a candidate URL to the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Render this URL next; it has already been marked visited
    Visit(String),

    /// The traversal ends here
    Stop(StopReason),
}

/// Run-wide visited set plus the per-seed page cap
#[derive(Debug)]
pub struct Frontier {
    visited: VisitedSet,
    max_pages_per_seed: u32,
}

impl Frontier {
    pub fn new(max_pages_per_seed: u32) -> Self {
        Self {
            visited: VisitedSet::new(),
            max_pages_per_seed,
        }
    }

    /// A fresh budget for the next seed
    pub fn budget(&self) -> CrawlBudget {
        CrawlBudget::new(self.max_pages_per_seed)
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Decides whether `candidate` is visited next
    ///
    /// # Rules
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | No candidate, or an empty one | Stop(EndOfChain) |
    /// | Budget already spent | Stop(BudgetExhausted) |
    /// | Candidate visited earlier in the run | Stop(AlreadyVisited) |
    /// | Otherwise | Visit, after consuming budget and marking visited |
    pub fn admit(&mut self, candidate: Option<&str>, budget: &mut CrawlBudget) -> Admission {
        let url = match candidate {
            Some(url) if !url.is_empty() => url,
            _ => return Admission::Stop(StopReason::EndOfChain),
        };

        if budget.is_exhausted() {
            return Admission::Stop(StopReason::BudgetExhausted);
        }

        if self.visited.contains(url) {
            return Admission::Stop(StopReason::AlreadyVisited);
        }

        budget.take();
        self.visited.insert(url);
        Admission::Visit(url.to_string())
    }
}

/// Per-seed traversal states and outcomes
///
/// A seed's traversal cycles through rendering, extracting and deciding until
/// it reaches `Done`. How it got there is recorded as a `SeedOutcome`.
use crate::PageError;
use std::fmt;

/// Represents where a seed's traversal currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Picking the next target (the seed itself or a followed "Next" link)
    Start,

    /// Navigating to the target and waiting for it to settle
    Rendering,

    /// Scraping the rendered page
    Extracting,

    /// Applying the frontier rule to the page's "Next" link
    Deciding,

    /// Traversal finished, successfully or not
    Done,
}

impl CrawlState {
    /// Returns true if the traversal is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Start, Self::Rendering)
                | (Self::Start, Self::Done)
                | (Self::Rendering, Self::Extracting)
                | (Self::Rendering, Self::Done)
                | (Self::Extracting, Self::Deciding)
                | (Self::Extracting, Self::Done)
                | (Self::Deciding, Self::Rendering)
                | (Self::Deciding, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Rendering => "rendering",
            Self::Extracting => "extracting",
            Self::Deciding => "deciding",
            Self::Done => "done",
        }
    }

    /// Returns all possible crawl states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Start,
            Self::Rendering,
            Self::Extracting,
            Self::Deciding,
            Self::Done,
        ]
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a traversal stopped without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The last page had no qualifying "Next" link
    EndOfChain,

    /// The "Next" link (or the seed itself) was already visited this run
    AlreadyVisited,

    /// The per-seed page cap was reached
    BudgetExhausted,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndOfChain => "end_of_chain",
            Self::AlreadyVisited => "already_visited",
            Self::BudgetExhausted => "budget_exhausted",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a seed's traversal ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Stopped by the frontier rule
    Completed(StopReason),

    /// Stopped because a page failed to render or extract
    Terminated(PageError),
}

impl SeedOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }

    /// The stop reason, if the traversal completed
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Completed(reason) => Some(*reason),
            Self::Terminated(_) => None,
        }
    }

    /// The page error, if the traversal was cut short
    pub fn error(&self) -> Option<&PageError> {
        match self {
            Self::Completed(_) => None,
            Self::Terminated(error) => Some(error),
        }
    }
}

impl fmt::Display for SeedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(reason) => write!(f, "completed ({})", reason),
            Self::Terminated(error) => write!(f, "terminated ({})", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_is_terminal() {
        assert!(CrawlState::Done.is_terminal());

        assert!(!CrawlState::Start.is_terminal());
        assert!(!CrawlState::Rendering.is_terminal());
        assert!(!CrawlState::Extracting.is_terminal());
        assert!(!CrawlState::Deciding.is_terminal());
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(CrawlState::Start.can_transition_to(CrawlState::Rendering));
        assert!(CrawlState::Rendering.can_transition_to(CrawlState::Extracting));
        assert!(CrawlState::Extracting.can_transition_to(CrawlState::Deciding));
        assert!(CrawlState::Deciding.can_transition_to(CrawlState::Rendering));
        assert!(CrawlState::Deciding.can_transition_to(CrawlState::Done));
    }

    #[test]
    fn test_every_active_state_can_finish() {
        for state in CrawlState::all_states() {
            if !state.is_terminal() {
                assert!(state.can_transition_to(CrawlState::Done), "{}", state);
            }
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!CrawlState::Start.can_transition_to(CrawlState::Extracting));
        assert!(!CrawlState::Rendering.can_transition_to(CrawlState::Deciding));
        assert!(!CrawlState::Extracting.can_transition_to(CrawlState::Rendering));

        for state in CrawlState::all_states() {
            assert!(!CrawlState::Done.can_transition_to(state));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CrawlState::Rendering), "rendering");
        assert_eq!(format!("{}", StopReason::AlreadyVisited), "already_visited");
        assert_eq!(
            format!("{}", SeedOutcome::Completed(StopReason::EndOfChain)),
            "completed (end_of_chain)"
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let completed = SeedOutcome::Completed(StopReason::BudgetExhausted);
        assert!(completed.is_completed());
        assert_eq!(completed.stop_reason(), Some(StopReason::BudgetExhausted));
        assert!(completed.error().is_none());

        let error = PageError::Timeout {
            url: "https://docs.example.com/a".to_string(),
            timeout: Duration::from_secs(20),
        };
        let terminated = SeedOutcome::Terminated(error.clone());
        assert!(terminated.is_terminated());
        assert_eq!(terminated.stop_reason(), None);
        assert_eq!(terminated.error(), Some(&error));
    }
}

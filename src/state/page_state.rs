//! Page state definitions for tracking progress through a results page
//!
//! Each results page walks `Pending -> LinksCollected -> ItemsProcessed -> Completed`,
//! or goes straight from `Pending` to `Skipped` when the ledger already has it.
//! Only `Completed` (and an existing marker behind `Skipped`) is durable; the
//! intermediate states live for the duration of one `process_page` call.

use std::fmt;

/// Represents the current state of a results page in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Not yet looked at in this run
    Pending,

    /// Item links have been collected (possibly none)
    LinksCollected,

    /// Every collected item has been attempted
    ItemsProcessed,

    /// Completion marker written
    Completed,

    /// Completion marker already present; nothing fetched
    Skipped,
}

impl PageState {
    /// Returns true if no further work happens for the page in this run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    ///
    /// An empty links list jumps from `LinksCollected` straight to `Completed`.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (*self, next),
            (Self::Pending, Self::LinksCollected)
                | (Self::Pending, Self::Skipped)
                | (Self::LinksCollected, Self::ItemsProcessed)
                | (Self::LinksCollected, Self::Completed)
                | (Self::ItemsProcessed, Self::Completed)
        )
    }

    /// Short lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::LinksCollected => "links_collected",
            Self::ItemsProcessed => "items_processed",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!PageState::Pending.is_terminal());
        assert!(!PageState::LinksCollected.is_terminal());
        assert!(!PageState::ItemsProcessed.is_terminal());

        assert!(PageState::Completed.is_terminal());
        assert!(PageState::Skipped.is_terminal());
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(PageState::Pending.can_transition_to(PageState::LinksCollected));
        assert!(PageState::LinksCollected.can_transition_to(PageState::ItemsProcessed));
        assert!(PageState::ItemsProcessed.can_transition_to(PageState::Completed));
    }

    #[test]
    fn test_shortcuts() {
        assert!(PageState::Pending.can_transition_to(PageState::Skipped));
        assert!(PageState::LinksCollected.can_transition_to(PageState::Completed));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!PageState::Pending.can_transition_to(PageState::Completed));
        assert!(!PageState::Pending.can_transition_to(PageState::ItemsProcessed));
        assert!(!PageState::ItemsProcessed.can_transition_to(PageState::LinksCollected));
        assert!(!PageState::LinksCollected.can_transition_to(PageState::Skipped));

        let all = [
            PageState::Pending,
            PageState::LinksCollected,
            PageState::ItemsProcessed,
            PageState::Completed,
            PageState::Skipped,
        ];
        for state in all {
            assert!(!PageState::Completed.can_transition_to(state));
            assert!(!PageState::Skipped.can_transition_to(state));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PageState::Pending), "pending");
        assert_eq!(format!("{}", PageState::LinksCollected), "links_collected");
        assert_eq!(format!("{}", PageState::Skipped), "skipped");
    }
}

//! List-view mode selection: month paging when idle, the full sorted result
//! set once any filter is active.

use chrono::{DateTime, Utc};
use shared::{
    domain::{Event, MonthKey},
    filters::FilterState,
};

/// True when any predicate would narrow the result set.
pub fn is_filtering_active(filters: &FilterState) -> bool {
    !filters.search_term().trim().is_empty()
        || !filters.selected_categories().is_empty()
        || !filters.selected_organizers().is_empty()
        || !filters.selected_months().is_empty()
        || filters.selected_continent().is_some()
        || filters.selected_country().is_some()
        || filters.user_location().is_some()
        || filters.favorites_only()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseMode {
    Month(MonthKey),
    Filtered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseView {
    pub mode: BrowseMode,
    pub events: Vec<Event>,
}

impl BrowseView {
    /// Month navigation is offered only while paging.
    pub fn navigation_visible(&self) -> bool {
        matches!(self.mode, BrowseMode::Month(_))
    }
}

#[derive(Debug, Clone)]
pub struct BrowseModeController {
    viewed: MonthKey,
}

impl BrowseModeController {
    /// Starts on the month containing `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::starting_at(MonthKey::from_date(now))
    }

    pub fn starting_at(month: MonthKey) -> Self {
        Self { viewed: month }
    }

    pub fn viewed_month(&self) -> MonthKey {
        self.viewed
    }

    /// Stops at the first representable month.
    pub fn previous(&mut self) -> MonthKey {
        self.viewed = self.viewed.shift(-1);
        self.viewed
    }

    /// Stops at the last representable month.
    pub fn next(&mut self) -> MonthKey {
        self.viewed = self.viewed.shift(1);
        self.viewed
    }

    /// Sorts `filtered` by start and, when idle, keeps only events starting
    /// in the viewed month.
    pub fn display(&self, filtered: &[Event], filters: &FilterState) -> BrowseView {
        let mut events = filtered.to_vec();
        events.sort_by_key(|event| event.start);

        if is_filtering_active(filters) {
            return BrowseView {
                mode: BrowseMode::Filtered,
                events,
            };
        }

        events.retain(|event| event.starts_in(self.viewed));
        BrowseView {
            mode: BrowseMode::Month(self.viewed),
            events,
        }
    }
}

#[cfg(test)]
#[path = "tests/browse_tests.rs"]
mod tests;

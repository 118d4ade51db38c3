//! Predicate composition over an immutable event snapshot.
//!
//! An event survives only if every active predicate passes. Within a
//! predicate that takes a set (months, categories, organizers) any member
//! matching is enough. Missing data never errors; it simply fails the
//! predicate that needed it.

use shared::{
    domain::{Event, MonthKey},
    filters::FilterState,
    taxonomy::CategoryGroup,
};

use crate::{favorites::Favorites, geo::distance_meters};

/// Fuzzy taxonomy match: the event category contains the group id, or the
/// group label contains the event category (both case-insensitive).
///
/// Short categories over-match ("a" is inside most labels) and synonyms in
/// `items` are ignored. Callers depend on exactly this rule.
pub fn category_matches(category: &str, group: &CategoryGroup) -> bool {
    let category = category.to_lowercase();
    category.contains(&group.id.to_lowercase()) || group.label.to_lowercase().contains(&category)
}

pub struct FilterEngine {
    taxonomy: Vec<CategoryGroup>,
}

impl FilterEngine {
    pub fn new(taxonomy: Vec<CategoryGroup>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &[CategoryGroup] {
        &self.taxonomy
    }

    /// Returns the events passing every active predicate, in input order.
    pub fn select(
        &self,
        events: &[Event],
        filters: &FilterState,
        favorites: &Favorites,
    ) -> Vec<Event> {
        events
            .iter()
            .filter(|event| self.matches(event, filters, favorites))
            .cloned()
            .collect()
    }

    pub fn matches(&self, event: &Event, filters: &FilterState, favorites: &Favorites) -> bool {
        passes_favorites(event, filters, favorites)
            && passes_search(event, filters)
            && self.passes_categories(event, filters)
            && passes_organizers(event, filters)
            && passes_months(event, filters)
            && passes_location(event, filters)
            && passes_radius(event, filters)
    }

    fn passes_categories(&self, event: &Event, filters: &FilterState) -> bool {
        let selected = filters.selected_categories();
        if selected.is_empty() {
            return true;
        }
        selected.iter().any(|group_id| {
            self.taxonomy
                .iter()
                .find(|group| &group.id == group_id)
                .is_some_and(|group| category_matches(&event.category, group))
        })
    }
}

fn passes_favorites(event: &Event, filters: &FilterState, favorites: &Favorites) -> bool {
    !filters.favorites_only() || favorites.contains(event.id)
}

fn passes_search(event: &Event, filters: &FilterState) -> bool {
    let term = filters.search_term();
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    event.title.to_lowercase().contains(&term) || event.city.to_lowercase().contains(&term)
}

fn passes_organizers(event: &Event, filters: &FilterState) -> bool {
    let selected = filters.selected_organizers();
    selected.is_empty()
        || selected.contains(&event.organizer)
        || event
            .co_facilitators
            .iter()
            .any(|facilitator| selected.contains(&facilitator.name))
}

fn passes_months(event: &Event, filters: &FilterState) -> bool {
    let selected = filters.selected_months();
    selected.is_empty() || selected.iter().any(|month| overlaps_month(event, *month))
}

/// Closed-interval overlap between the event span and the month span.
pub fn overlaps_month(event: &Event, month: MonthKey) -> bool {
    let (month_start, month_end) = month.bounds();
    event.end >= month_start && event.start <= month_end
}

fn passes_location(event: &Event, filters: &FilterState) -> bool {
    if let Some(continent) = filters.selected_continent() {
        if event.continent.to_lowercase() != continent.to_lowercase() {
            return false;
        }
    }
    match filters.selected_country() {
        Some(country) => event.country == country,
        None => true,
    }
}

fn passes_radius(event: &Event, filters: &FilterState) -> bool {
    let Some(origin) = filters.user_location() else {
        return true;
    };
    let Some(position) = event.coordinate else {
        return false;
    };
    distance_meters(position, origin) <= filters.radius_meters()
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;

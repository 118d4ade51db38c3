//! Derived views over the event snapshot used by search and sidebar surfaces.

use std::collections::BTreeMap;

use shared::{
    domain::Event,
    taxonomy::{CategoryGroup, DEFAULT_CATEGORY_COLOR},
};

use crate::filter::category_matches;

const MAX_SUGGESTIONS: usize = 5;

/// Registered organizers and co-facilitators keyed by name. Later events
/// overwrite the avatar of an earlier one with the same name.
pub fn facilitator_directory(events: &[Event]) -> BTreeMap<String, String> {
    let mut directory = BTreeMap::new();
    for event in events {
        if event.organizer_is_registered {
            directory.insert(event.organizer.clone(), event.organizer_avatar.clone());
        }
        for facilitator in event.co_facilitators.iter().filter(|f| f.is_registered) {
            directory.insert(facilitator.name.clone(), facilitator.avatar.clone());
        }
    }
    directory
}

/// Titles of the first few events whose title or city contains `term`.
/// Terms of one character or less produce nothing.
pub fn search_suggestions(events: &[Event], term: &str) -> Vec<String> {
    if term.chars().count() <= 1 {
        return Vec::new();
    }
    let needle = term.to_lowercase();
    let mut suggestions: Vec<String> = Vec::new();
    for title in events
        .iter()
        .filter(|event| {
            event.title.to_lowercase().contains(&needle)
                || event.city.to_lowercase().contains(&needle)
        })
        .map(|event| &event.title)
        .take(MAX_SUGGESTIONS)
    {
        if !suggestions.contains(title) {
            suggestions.push(title.clone());
        }
    }
    suggestions
}

pub fn category_color<'a>(category: &str, taxonomy: &'a [CategoryGroup]) -> &'a str {
    if category.is_empty() {
        return DEFAULT_CATEGORY_COLOR;
    }
    taxonomy
        .iter()
        .find(|group| category_matches(category, group))
        .map_or(DEFAULT_CATEGORY_COLOR, |group| group.color.as_str())
}

#[cfg(test)]
#[path = "tests/facets_tests.rs"]
mod tests;

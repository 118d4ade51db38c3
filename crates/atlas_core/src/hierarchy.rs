//! Continent → country facet index over the unfiltered event set.

use std::collections::{BTreeMap, BTreeSet};

use shared::domain::Event;

/// Derived, never persisted. Rebuild whenever the event snapshot changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationHierarchy {
    continents: BTreeMap<String, BTreeSet<String>>,
}

impl LocationHierarchy {
    /// Continents are keyed lower-case; countries keep their source casing.
    /// Events missing either part are skipped.
    pub fn build(events: &[Event]) -> Self {
        let mut continents: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for event in events {
            if event.continent.is_empty() || event.country.is_empty() {
                continue;
            }
            continents
                .entry(event.continent.to_lowercase())
                .or_default()
                .insert(event.country.clone());
        }
        Self { continents }
    }

    pub fn continents(&self) -> impl Iterator<Item = &str> {
        self.continents.keys().map(String::as_str)
    }

    /// Countries for a continent, sorted; empty for unknown continents.
    pub fn countries(&self, continent: &str) -> Vec<&str> {
        self.continents
            .get(&continent.to_lowercase())
            .map(|countries| countries.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.continents
    }

    pub fn is_empty(&self) -> bool {
        self.continents.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/hierarchy_tests.rs"]
mod tests;

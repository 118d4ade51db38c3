use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, MonthKey};

pub const DEFAULT_RADIUS_METERS: f64 = 100_000.0;

/// The complete filtering intent. Never mutated in place: every user action
/// goes through [`FilterState::apply`] and yields a fresh value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    search_term: String,
    year: i32,
    selected_months: BTreeSet<MonthKey>,
    selected_categories: BTreeSet<String>,
    selected_organizers: BTreeSet<String>,
    selected_continent: Option<String>,
    selected_country: Option<String>,
    radius_meters: f64,
    user_location: Option<Coordinate>,
    favorites_only: bool,
}

/// One user action against a [`FilterState`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    SetSearchTerm(String),
    SetYear(i32),
    ToggleMonth(MonthKey),
    ToggleCategory(String),
    SelectCategories(Vec<String>),
    ClearCategories,
    ToggleOrganizer(String),
    /// Selecting a continent always drops any country selection.
    SelectContinent(String),
    /// `None` means "all countries of the selected continent".
    SelectCountry(Option<String>),
    ClearLocation,
    SetRadius(f64),
    SetUserLocation(Option<Coordinate>),
    ToggleFavoritesOnly,
}

impl FilterState {
    pub fn new(year: i32) -> Self {
        Self::with_radius(year, DEFAULT_RADIUS_METERS)
    }

    pub fn with_radius(year: i32, radius_meters: f64) -> Self {
        Self {
            search_term: String::new(),
            year,
            selected_months: BTreeSet::new(),
            selected_categories: BTreeSet::new(),
            selected_organizers: BTreeSet::new(),
            selected_continent: None,
            selected_country: None,
            radius_meters: sanitize_radius(radius_meters).unwrap_or(DEFAULT_RADIUS_METERS),
            user_location: None,
            favorites_only: false,
        }
    }

    #[must_use]
    pub fn apply(&self, change: FilterChange) -> Self {
        let mut next = self.clone();
        match change {
            FilterChange::SetSearchTerm(term) => next.search_term = term,
            FilterChange::SetYear(year) => next.year = year,
            FilterChange::ToggleMonth(month) => toggle(&mut next.selected_months, month),
            FilterChange::ToggleCategory(id) => toggle(&mut next.selected_categories, id),
            FilterChange::SelectCategories(ids) => {
                next.selected_categories = ids.into_iter().collect();
            }
            FilterChange::ClearCategories => next.selected_categories.clear(),
            FilterChange::ToggleOrganizer(name) => toggle(&mut next.selected_organizers, name),
            FilterChange::SelectContinent(continent) => {
                next.selected_continent = Some(continent.to_lowercase());
                next.selected_country = None;
            }
            FilterChange::SelectCountry(country) => next.selected_country = country,
            FilterChange::ClearLocation => {
                next.selected_continent = None;
                next.selected_country = None;
            }
            FilterChange::SetRadius(radius) => {
                if let Some(radius) = sanitize_radius(radius) {
                    next.radius_meters = radius;
                }
            }
            FilterChange::SetUserLocation(location) => next.user_location = location,
            FilterChange::ToggleFavoritesOnly => next.favorites_only = !next.favorites_only,
        }
        next
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn selected_months(&self) -> &BTreeSet<MonthKey> {
        &self.selected_months
    }

    pub fn selected_categories(&self) -> &BTreeSet<String> {
        &self.selected_categories
    }

    pub fn selected_organizers(&self) -> &BTreeSet<String> {
        &self.selected_organizers
    }

    pub fn selected_continent(&self) -> Option<&str> {
        self.selected_continent.as_deref()
    }

    pub fn selected_country(&self) -> Option<&str> {
        self.selected_country.as_deref()
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

fn sanitize_radius(radius: f64) -> Option<f64> {
    (radius.is_finite() && radius > 0.0).then_some(radius)
}

#[cfg(test)]
#[path = "tests/filters_tests.rs"]
mod tests;

//! One user's view over the event snapshot: filters, favorites, selection,
//! clustered map and month-paged list, all kept in step.

use std::{collections::BTreeMap, time::Duration};

use chrono::{DateTime, Datelike, Utc};
use shared::{
    domain::{Coordinate, Event, EventId},
    filters::{FilterChange, FilterState, DEFAULT_RADIUS_METERS},
    taxonomy::{default_category_groups, CategoryGroup},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    browse::{BrowseModeController, BrowseView},
    cluster::{ClusterActivation, ClusterConfig, ClusterController, ClusterGroup},
    descriptions::{DescriptionCache, DescriptionSource},
    facets,
    favorites::{Favorites, FavoritesBook, FavoritesStore, StoreError},
    filter::FilterEngine,
    geolocation::{GeolocationProvider, LocateError, LocateStep, LocateTicket, Locator},
    hierarchy::LocationHierarchy,
    links,
    signals::{Subscription, ViewCoordinator, ViewSignal},
    viewport::{ViewportConfig, ViewportPhase},
};

pub const LOCATE_FAILED_NOTICE: &str = "Could not access location.";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cluster: ClusterConfig,
    pub viewport: ViewportConfig,
    pub radius_meters: f64,
    pub taxonomy: Vec<CategoryGroup>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cluster: ClusterConfig::default(),
            viewport: ViewportConfig::default(),
            radius_meters: DEFAULT_RADIUS_METERS,
            taxonomy: default_category_groups(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Map,
    List,
}

pub struct EventSession<S> {
    events: Vec<Event>,
    hierarchy: LocationHierarchy,
    engine: FilterEngine,
    filters: FilterState,
    favorites: FavoritesBook<S>,
    filtered: Vec<Event>,
    browse: BrowseModeController,
    clusters: ClusterController,
    coordinator: ViewCoordinator,
    selection_signals: Subscription,
    selected: Option<EventId>,
    view_mode: ViewMode,
    locator: Locator,
    notice: Option<String>,
    descriptions: DescriptionCache,
}

impl<S: FavoritesStore> EventSession<S> {
    /// Loads favorites from `store` and derives every view from `events`.
    pub async fn start(
        events: Vec<Event>,
        store: S,
        config: SessionConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let favorites = FavoritesBook::load(store).await;
        let mut coordinator = ViewCoordinator::new();
        let mut clusters = ClusterController::new(config.cluster, config.viewport);
        clusters.attach(&mut coordinator);
        let selection_signals = coordinator.subscribe();

        let mut session = Self {
            hierarchy: LocationHierarchy::build(&events),
            events,
            engine: FilterEngine::new(config.taxonomy),
            filters: FilterState::with_radius(now.year(), config.radius_meters),
            favorites,
            filtered: Vec::new(),
            browse: BrowseModeController::new(now),
            clusters,
            coordinator,
            selection_signals,
            selected: None,
            view_mode: ViewMode::default(),
            locator: Locator::default(),
            notice: None,
            descriptions: DescriptionCache::new(),
        };
        session.refresh();
        info!(
            events = session.events.len(),
            favorites = session.favorites.current().len(),
            "event session started"
        );
        session
    }

    /// Swaps in a freshly fetched snapshot. Selection survives only if the
    /// selected event is still present.
    pub fn replace_events(&mut self, events: Vec<Event>) {
        self.hierarchy = LocationHierarchy::build(&events);
        self.events = events;
        if let Some(id) = self.selected {
            if links::find_by_id(&self.events, id).is_none() {
                self.selected = None;
            }
        }
        self.refresh();
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filtered(&self) -> &[Event] {
        &self.filtered
    }

    pub fn hierarchy(&self) -> &LocationHierarchy {
        &self.hierarchy
    }

    pub fn taxonomy(&self) -> &[CategoryGroup] {
        self.engine.taxonomy()
    }

    pub fn apply(&mut self, change: FilterChange) {
        debug!(?change, "applying filter change");
        self.filters = self.filters.apply(change);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.filtered = self
            .engine
            .select(&self.events, &self.filters, self.favorites.current());
        self.clusters.rebuild(&self.filtered);
        debug!(
            matched = self.filtered.len(),
            total = self.events.len(),
            "recomputed filtered events"
        );
    }

    pub fn list_view(&self) -> BrowseView {
        self.browse.display(&self.filtered, &self.filters)
    }

    pub fn previous_month(&mut self) {
        self.browse.previous();
    }

    pub fn next_month(&mut self) {
        self.browse.next();
    }

    pub fn clusters(&self) -> &ClusterController {
        &self.clusters
    }

    pub fn cluster_groups(&self) -> &[ClusterGroup] {
        self.clusters.groups()
    }

    /// Activates the cluster at `index` of the current grouping.
    pub fn activate_cluster(&mut self, index: usize) -> Option<ClusterActivation> {
        let cluster = self.clusters.groups().get(index)?.clone();
        Some(self.clusters.on_cluster_activate(&cluster))
    }

    pub fn set_view(&mut self, center: Coordinate, zoom: f64) {
        self.clusters.set_view(center, zoom);
    }

    pub fn advance_animation(&mut self, dt: Duration) -> ViewportPhase {
        self.clusters.advance(dt)
    }

    pub fn overview_button_visible(&self) -> bool {
        self.clusters.overview_button_visible()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn selected(&self) -> Option<&Event> {
        self.selected
            .and_then(|id| links::find_by_id(&self.events, id))
    }

    /// Selects an event from the snapshot and flies to it when it is placed.
    /// Returns false for unknown ids.
    pub fn select_event(&mut self, id: EventId) -> bool {
        let Some(event) = links::find_by_id(&self.events, id) else {
            debug!(event_id = %id, "ignoring selection of unknown event");
            return false;
        };
        let target = event.coordinate;
        self.selected = Some(id);
        if let Some(position) = target {
            let zoom = self.clusters.viewport().config().event_focus_zoom;
            self.clusters.focus(position, zoom);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Selects the event named by a shared link, if it is in the snapshot.
    pub fn open_deep_link(&mut self, url: &Url) -> Option<EventId> {
        let id = links::deep_link_event_id(url)?;
        self.select_event(id).then_some(id)
    }

    pub fn is_favorite(&self, id: EventId) -> bool {
        self.favorites.current().contains(id)
    }

    pub fn favorites(&self) -> &Favorites {
        self.favorites.current()
    }

    pub fn favorites_store(&self) -> &S {
        self.favorites.store()
    }

    pub async fn toggle_favorite(&mut self, id: EventId) -> Result<bool, StoreError> {
        let saved = self.favorites.toggle(id).await?;
        if self.filters.favorites_only() {
            self.refresh();
        }
        Ok(saved)
    }

    /// Broadcasts a reset to every listener and applies it here.
    pub fn request_reset(&mut self) {
        self.coordinator.request_reset();
        self.dispatch_signals();
    }

    fn dispatch_signals(&mut self) {
        self.clusters.poll_signals();
        for signal in self.selection_signals.drain() {
            match signal {
                ViewSignal::ResetView => {
                    self.selected = None;
                    self.view_mode = ViewMode::Map;
                }
            }
        }
    }

    /// An existing user location is cleared rather than refreshed.
    pub fn begin_locate(&mut self) -> LocateStep {
        if self.filters.user_location().is_some() {
            self.apply(FilterChange::SetUserLocation(None));
            return LocateStep::Cleared;
        }
        match self.locator.begin() {
            Some(ticket) => LocateStep::Request(ticket),
            None => LocateStep::AlreadyLocating,
        }
    }

    pub fn finish_locate(&mut self, ticket: LocateTicket, result: Result<Coordinate, LocateError>) {
        self.locator.finish(ticket);
        match result {
            Ok(position) => {
                self.notice = None;
                self.apply(FilterChange::SetUserLocation(Some(position)));
                let zoom = self.clusters.viewport().config().user_focus_zoom;
                self.clusters.focus(position, zoom);
            }
            Err(err) => {
                warn!(error = %err, "geolocation failed");
                self.notice = Some(LOCATE_FAILED_NOTICE.to_string());
            }
        }
    }

    /// Runs a full locate toggle against `provider` and returns the user
    /// location afterwards.
    pub async fn locate<P: GeolocationProvider + ?Sized>(
        &mut self,
        provider: &P,
    ) -> Option<Coordinate> {
        if let LocateStep::Request(ticket) = self.begin_locate() {
            let result = provider.current_position().await;
            self.finish_locate(ticket, result);
        }
        self.filters.user_location()
    }

    pub fn is_locating(&self) -> bool {
        self.locator.is_locating()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub async fn description<D: DescriptionSource + ?Sized>(
        &mut self,
        source: &D,
        id: EventId,
    ) -> &str {
        self.descriptions.load(source, id).await
    }

    /// Description already fetched for `id`, without touching the source.
    pub fn cached_description(&self, id: EventId) -> Option<&str> {
        self.descriptions.get(id)
    }

    pub fn facilitators(&self) -> BTreeMap<String, String> {
        facets::facilitator_directory(&self.events)
    }

    pub fn suggestions(&self, term: &str) -> Vec<String> {
        facets::search_suggestions(&self.events, term)
    }

    pub fn category_color(&self, category: &str) -> &str {
        facets::category_color(category, self.engine.taxonomy())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

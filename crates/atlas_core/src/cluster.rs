//! Marker clustering and cluster-driven viewport moves.
//!
//! Markers within `max_cluster_radius_px` of a cluster's anchor, measured in
//! pixels at the current integer zoom, share a cluster. Because the radius is
//! fixed in pixels its ground distance halves with every zoom level, so
//! clusters dissolve as the map zooms in, and at `disable_clustering_at_zoom`
//! every marker stands alone. Groups are rebuilt from scratch; nothing from a
//! previous grouping survives a rebuild.

use std::time::Duration;

use shared::domain::{Coordinate, Event, EventId};
use tracing::debug;

use crate::{
    signals::{Subscription, ViewCoordinator, ViewSignal},
    viewport::{project, unproject, PixelPoint, Viewport, ViewportConfig, ViewportPhase},
};

#[derive(Debug, Clone)]
pub struct ClusterConfig {
    pub max_cluster_radius_px: f64,
    pub disable_clustering_at_zoom: f64,
    /// Activation from below this zoom never lands deeper than it.
    pub neighborhood_zoom: f64,
    pub fit_padding_px: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_cluster_radius_px: 55.0,
            disable_clustering_at_zoom: 18.0,
            neighborhood_zoom: 15.0,
            fit_padding_px: 20.0,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn around(point: Coordinate) -> Self {
        Self {
            south: point.lat,
            west: point.lng,
            north: point.lat,
            east: point.lng,
        }
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lng)
    }

    /// Midpoint in projected space, which is where a fitted map centers.
    pub fn projected_center(&self) -> Coordinate {
        let north_west = project(Coordinate::new(self.north, self.west), 0.0);
        let south_east = project(Coordinate::new(self.south, self.east), 0.0);
        unproject(
            PixelPoint {
                x: (north_west.x + south_east.x) / 2.0,
                y: (north_west.y + south_east.y) / 2.0,
            },
            0.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGroup {
    pub members: Vec<EventId>,
    pub bounds: Bounds,
    /// Mean position of the members.
    pub representative: Coordinate,
}

impl ClusterGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClusterActivation {
    /// The viewport is flying to `center` at `zoom`.
    Zoom { center: Coordinate, zoom: f64 },
    /// Already at maximum zoom; fan the members out instead.
    Spiderfy { members: Vec<EventId> },
}

struct PendingGroup {
    anchor: PixelPoint,
    members: Vec<EventId>,
    bounds: Bounds,
    lat_sum: f64,
    lng_sum: f64,
}

impl PendingGroup {
    fn start(id: EventId, position: Coordinate, anchor: PixelPoint) -> Self {
        Self {
            anchor,
            members: vec![id],
            bounds: Bounds::around(position),
            lat_sum: position.lat,
            lng_sum: position.lng,
        }
    }

    fn push(&mut self, id: EventId, position: Coordinate) {
        self.members.push(id);
        self.bounds.extend(position);
        self.lat_sum += position.lat;
        self.lng_sum += position.lng;
    }

    fn finish(self) -> ClusterGroup {
        let count = self.members.len() as f64;
        ClusterGroup {
            representative: Coordinate::new(self.lat_sum / count, self.lng_sum / count),
            members: self.members,
            bounds: self.bounds,
        }
    }
}

/// Groups `markers` at `zoom`. Pure; input order decides anchors.
pub fn group_markers(
    markers: &[(EventId, Coordinate)],
    zoom: f64,
    config: &ClusterConfig,
) -> Vec<ClusterGroup> {
    let level = zoom.floor();
    if level >= config.disable_clustering_at_zoom {
        return markers
            .iter()
            .map(|(id, position)| {
                PendingGroup::start(*id, *position, project(*position, level)).finish()
            })
            .collect();
    }

    let mut pending: Vec<PendingGroup> = Vec::new();
    for (id, position) in markers {
        let pixel = project(*position, level);
        match pending
            .iter_mut()
            .find(|group| group.anchor.distance_to(pixel) <= config.max_cluster_radius_px)
        {
            Some(group) => group.push(*id, *position),
            None => pending.push(PendingGroup::start(*id, *position, pixel)),
        }
    }
    pending.into_iter().map(PendingGroup::finish).collect()
}

pub struct ClusterController {
    config: ClusterConfig,
    viewport: Viewport,
    markers: Vec<(EventId, Coordinate)>,
    groups: Vec<ClusterGroup>,
    grouped_at: f64,
    reset_signals: Option<Subscription>,
}

impl ClusterController {
    pub fn new(config: ClusterConfig, viewport: ViewportConfig) -> Self {
        let viewport = Viewport::new(viewport);
        let grouped_at = viewport.zoom().floor();
        Self {
            config,
            viewport,
            markers: Vec::new(),
            groups: Vec::new(),
            grouped_at,
            reset_signals: None,
        }
    }

    /// Listens for reset broadcasts from `coordinator`.
    pub fn attach(&mut self, coordinator: &mut ViewCoordinator) {
        if let Some(previous) = self.reset_signals.take() {
            coordinator.unsubscribe(previous.id());
        }
        self.reset_signals = Some(coordinator.subscribe());
    }

    pub fn detach(&mut self, coordinator: &mut ViewCoordinator) {
        if let Some(subscription) = self.reset_signals.take() {
            coordinator.unsubscribe(subscription.id());
        }
    }

    /// Applies pending reset signals. Returns whether a reset happened.
    pub fn poll_signals(&mut self) -> bool {
        let Some(subscription) = &self.reset_signals else {
            return false;
        };
        let reset = subscription
            .drain()
            .into_iter()
            .any(|signal| signal == ViewSignal::ResetView);
        if reset {
            self.reset();
        }
        reset
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn groups(&self) -> &[ClusterGroup] {
        &self.groups
    }

    /// Discards the current grouping and regroups `events`. Events without
    /// coordinates are not placed on the map.
    pub fn rebuild(&mut self, events: &[Event]) {
        self.markers = events
            .iter()
            .filter_map(|event| event.coordinate.map(|position| (event.id, position)))
            .collect();
        self.regroup();
    }

    /// Zooms toward `cluster`, or spiderfies it once the view is at
    /// `max_zoom`. Groups from [`Self::rebuild`] only reach the spiderfy
    /// branch when `disable_clustering_at_zoom` is above `max_zoom`; with
    /// the defaults every marker already stands alone at `max_zoom`.
    pub fn on_cluster_activate(&mut self, cluster: &ClusterGroup) -> ClusterActivation {
        let current = self.viewport.zoom();
        if current >= self.config.max_zoom {
            return ClusterActivation::Spiderfy {
                members: cluster.members.clone(),
            };
        }

        let mut zoom = self.fit_zoom(&cluster.bounds);
        if zoom <= current {
            zoom = (current.floor() + 1.0).min(self.config.max_zoom);
        }
        if current < self.config.neighborhood_zoom {
            zoom = zoom.min(self.config.neighborhood_zoom);
        }

        let center = cluster.bounds.projected_center();
        self.viewport.focus(center, zoom);
        ClusterActivation::Zoom { center, zoom }
    }

    /// Deepest whole zoom at which `bounds` fits the viewport minus padding.
    pub fn fit_zoom(&self, bounds: &Bounds) -> f64 {
        let config = self.viewport.config();
        let north_west = project(Coordinate::new(bounds.north, bounds.west), 0.0);
        let south_east = project(Coordinate::new(bounds.south, bounds.east), 0.0);
        let available_w = (config.width_px - 2.0 * self.config.fit_padding_px).max(1.0);
        let available_h = (config.height_px - 2.0 * self.config.fit_padding_px).max(1.0);

        let scale = fit_ratio(available_w, (south_east.x - north_west.x).abs())
            .min(fit_ratio(available_h, (south_east.y - north_west.y).abs()));
        if !scale.is_finite() {
            return self.config.max_zoom;
        }
        scale
            .log2()
            .floor()
            .clamp(self.config.min_zoom, self.config.max_zoom)
    }

    pub fn focus(&mut self, target: Coordinate, zoom: f64) {
        let zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        self.viewport.focus(target, zoom);
    }

    pub fn reset(&mut self) {
        self.viewport.reset();
    }

    /// Direct user pan/zoom.
    pub fn set_view(&mut self, center: Coordinate, zoom: f64) {
        let zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        self.viewport.set_view(center, zoom);
        self.sync_zoom_level();
    }

    pub fn advance(&mut self, dt: Duration) -> ViewportPhase {
        let phase = self.viewport.advance(dt);
        self.sync_zoom_level();
        phase
    }

    pub fn overview_button_visible(&self) -> bool {
        self.viewport.overview_button_visible()
    }

    fn sync_zoom_level(&mut self) {
        if self.viewport.zoom().floor() != self.grouped_at {
            self.regroup();
        }
    }

    fn regroup(&mut self) {
        let zoom = self.viewport.zoom();
        self.grouped_at = zoom.floor();
        self.groups = group_markers(&self.markers, zoom, &self.config);
        debug!(
            markers = self.markers.len(),
            groups = self.groups.len(),
            zoom = self.grouped_at,
            "rebuilt marker clusters"
        );
    }
}

fn fit_ratio(available: f64, span: f64) -> f64 {
    if span <= f64::EPSILON {
        f64::INFINITY
    } else {
        available / span
    }
}

#[cfg(test)]
#[path = "tests/cluster_tests.rs"]
mod tests;

//! Map camera state: Web Mercator projection and the fly-to animation.
//!
//! ```text
//! Idle --focus/reset--> Flying --duration elapsed--> Idle
//!                       Flying --focus/reset--> Flying (retargeted)
//!                       Flying --set_view--> Idle
//! ```

use std::{f64::consts::PI, time::Duration};

use shared::domain::Coordinate;

pub const TILE_SIZE: f64 = 256.0;
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn distance_to(self, other: PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Spherical Mercator projection into global pixel space at `zoom`.
pub fn project(coordinate: Coordinate, zoom: f64) -> PixelPoint {
    let scale = world_size(zoom);
    let lat = coordinate.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    PixelPoint {
        x: (coordinate.lng + 180.0) / 360.0 * scale,
        y: (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale,
    }
}

pub fn unproject(point: PixelPoint, zoom: f64) -> Coordinate {
    let scale = world_size(zoom);
    let n = PI - 2.0 * PI * point.y / scale;
    Coordinate {
        lat: n.sinh().atan().to_degrees(),
        lng: point.x / scale * 360.0 - 180.0,
    }
}

#[derive(Debug, Clone)]
pub struct ViewportConfig {
    pub width_px: f64,
    pub height_px: f64,
    pub overview_center: Coordinate,
    pub overview_zoom: f64,
    /// The "return to overview" affordance shows above this zoom.
    pub overview_button_zoom: f64,
    pub fly_duration: Duration,
    pub event_focus_zoom: f64,
    pub user_focus_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width_px: 1024.0,
            height_px: 768.0,
            overview_center: Coordinate::new(20.0, 0.0),
            overview_zoom: 2.0,
            overview_button_zoom: 3.0,
            fly_duration: Duration::from_millis(1500),
            event_focus_zoom: 15.0,
            user_focus_zoom: 9.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Coordinate,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportPhase {
    Idle,
    Flying,
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    from: Camera,
    to: Camera,
    elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    camera: Camera,
    flight: Option<Flight>,
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        let camera = Camera {
            center: config.overview_center,
            zoom: config.overview_zoom,
        };
        Self {
            config,
            camera,
            flight: None,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Where the camera is right now, mid-flight included.
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Where the camera will settle.
    pub fn destination(&self) -> Camera {
        self.flight.map(|flight| flight.to).unwrap_or(self.camera)
    }

    pub fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    pub fn phase(&self) -> ViewportPhase {
        if self.flight.is_some() {
            ViewportPhase::Flying
        } else {
            ViewportPhase::Idle
        }
    }

    /// Flies to `target`. Supersedes any flight in progress.
    pub fn focus(&mut self, target: Coordinate, zoom: f64) {
        self.fly_to(Camera {
            center: target,
            zoom,
        });
    }

    /// Flies back to the world overview regardless of current state.
    pub fn reset(&mut self) {
        self.fly_to(Camera {
            center: self.config.overview_center,
            zoom: self.config.overview_zoom,
        });
    }

    /// Direct user pan/zoom; cancels any flight.
    pub fn set_view(&mut self, center: Coordinate, zoom: f64) {
        self.flight = None;
        self.camera = Camera { center, zoom };
    }

    pub fn overview_button_visible(&self) -> bool {
        self.camera.zoom > self.config.overview_button_zoom
    }

    /// Moves the animation forward by `dt`.
    pub fn advance(&mut self, dt: Duration) -> ViewportPhase {
        let Some(mut flight) = self.flight else {
            return ViewportPhase::Idle;
        };

        flight.elapsed += dt;
        let duration = self.config.fly_duration;
        if flight.elapsed >= duration {
            self.camera = flight.to;
            self.flight = None;
            return ViewportPhase::Idle;
        }

        let t = flight.elapsed.as_secs_f64() / duration.as_secs_f64();
        self.camera = interpolate(flight.from, flight.to, t);
        self.flight = Some(flight);
        ViewportPhase::Flying
    }

    fn fly_to(&mut self, to: Camera) {
        if self.config.fly_duration.is_zero() {
            self.set_view(to.center, to.zoom);
            return;
        }
        self.flight = Some(Flight {
            from: self.camera,
            to,
            elapsed: Duration::ZERO,
        });
    }
}

fn interpolate(from: Camera, to: Camera, t: f64) -> Camera {
    let lerp = |a: f64, b: f64| a + (b - a) * t;
    Camera {
        center: Coordinate {
            lat: lerp(from.center.lat, to.center.lat),
            lng: lerp(from.center.lng, to.center.lng),
        },
        zoom: lerp(from.zoom, to.zoom),
    }
}

#[cfg(test)]
#[path = "tests/viewport_tests.rs"]
mod tests;

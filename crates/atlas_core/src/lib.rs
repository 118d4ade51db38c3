//! Filtering, clustering and browsing over a snapshot of geolocated events.

pub mod browse;
pub mod cluster;
pub mod descriptions;
pub mod facets;
pub mod favorites;
pub mod filter;
pub mod geo;
pub mod geolocation;
pub mod hierarchy;
pub mod links;
pub mod session;
pub mod signals;
pub mod source;
pub mod viewport;

pub use browse::{is_filtering_active, BrowseMode, BrowseModeController, BrowseView};
pub use cluster::{ClusterActivation, ClusterConfig, ClusterController, ClusterGroup};
pub use favorites::{Favorites, FavoritesBook, FavoritesStore, MemoryFavoritesStore, StoreError};
pub use filter::FilterEngine;
pub use session::{EventSession, SessionConfig, ViewMode};
pub use source::{
    fetch_events, load_events_or_empty, EventCatalog, EventSource, HttpEventSource,
    JsonFileEventSource, SourceError,
};
pub use viewport::{ViewportConfig, ViewportPhase};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

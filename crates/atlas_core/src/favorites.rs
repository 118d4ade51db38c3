//! Saved events: an id set persisted wholesale as a JSON array under one key.

use async_trait::async_trait;
use shared::domain::EventId;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Key of the durable entry holding the JSON array of saved ids.
pub const FAVORITES_KEY: &str = "saved_events";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("favorites store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode favorites: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable key-value entry owned outside the engine.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn load_raw(&self) -> Result<Option<String>, StoreError>;
    async fn save_raw(&self, payload: &str) -> Result<(), StoreError>;
}

/// Ordered, duplicate-free set of saved event ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    ids: Vec<EventId>,
}

impl Favorites {
    pub fn from_ids(ids: impl IntoIterator<Item = EventId>) -> Self {
        let mut favorites = Self::default();
        for id in ids {
            if !favorites.contains(id) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    /// Decodes a stored payload. Corrupt JSON yields an empty set.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Vec<i64>>(raw) {
            Ok(ids) => Self::from_ids(ids.into_iter().map(EventId)),
            Err(err) => {
                warn!(error = %err, "discarding malformed persisted favorites");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.ids.iter().map(|id| id.0).collect::<Vec<_>>())
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn toggled(&self, id: EventId) -> Self {
        let mut ids = self.ids.clone();
        if let Some(pos) = ids.iter().position(|existing| *existing == id) {
            ids.remove(pos);
        } else {
            ids.push(id);
        }
        Self { ids }
    }

    pub fn ids(&self) -> &[EventId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Current favorites plus the store they are written through to.
pub struct FavoritesBook<S> {
    store: S,
    current: Favorites,
}

impl<S: FavoritesStore> FavoritesBook<S> {
    /// Reads the store once. A missing, unreadable or corrupt entry starts empty.
    pub async fn load(store: S) -> Self {
        let current = match store.load_raw().await {
            Ok(Some(raw)) => Favorites::from_json(&raw),
            Ok(None) => Favorites::default(),
            Err(err) => {
                warn!(error = %err, "favorites store unreadable; starting empty");
                Favorites::default()
            }
        };
        debug!(count = current.len(), "loaded favorites");
        Self { store, current }
    }

    pub fn current(&self) -> &Favorites {
        &self.current
    }

    /// Flips membership and persists the full set before returning.
    /// Returns whether `id` is saved afterwards. On a store failure the
    /// in-memory set is left as it was.
    pub async fn toggle(&mut self, id: EventId) -> Result<bool, StoreError> {
        let next = self.current.toggled(id);
        let payload = next.to_json()?;
        self.store.save_raw(&payload).await?;
        self.current = next;
        let saved = self.current.contains(id);
        debug!(event_id = id.0, saved, "persisted favorites toggle");
        Ok(saved)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Process-local store, used when no durable backend is configured.
#[derive(Default)]
pub struct MemoryFavoritesStore {
    payload: Mutex<Option<String>>,
}

impl MemoryFavoritesStore {
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Mutex::new(Some(payload.into())),
        }
    }
}

#[async_trait]
impl FavoritesStore for MemoryFavoritesStore {
    async fn load_raw(&self) -> Result<Option<String>, StoreError> {
        Ok(self.payload.lock().await.clone())
    }

    async fn save_raw(&self, payload: &str) -> Result<(), StoreError> {
        *self.payload.lock().await = Some(payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/favorites_tests.rs"]
mod tests;

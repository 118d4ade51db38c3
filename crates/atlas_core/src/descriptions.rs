//! Lazily fetched event descriptions.

use std::collections::HashMap;

use async_trait::async_trait;
use shared::domain::EventId;
use tracing::{debug, warn};

use crate::source::SourceError;

/// Shown when a description is missing or could not be fetched.
pub const NO_DESCRIPTION: &str = "No description available.";

#[async_trait]
pub trait DescriptionSource: Send + Sync {
    async fn description(&self, id: EventId) -> Result<Option<String>, SourceError>;
}

/// Each id is fetched at most once; failures are cached as the fallback text.
#[derive(Debug, Default)]
pub struct DescriptionCache {
    entries: HashMap<EventId, String>,
}

impl DescriptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: EventId) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub async fn load<S: DescriptionSource + ?Sized>(&mut self, source: &S, id: EventId) -> &str {
        if !self.entries.contains_key(&id) {
            let text = match source.description(id).await {
                Ok(Some(text)) if !text.trim().is_empty() => text,
                Ok(_) => NO_DESCRIPTION.to_string(),
                Err(err) => {
                    warn!(event_id = %id, error = %err, "description fetch failed");
                    NO_DESCRIPTION.to_string()
                }
            };
            debug!(event_id = %id, "cached description");
            self.entries.insert(id, text);
        }
        self.get(id).unwrap_or(NO_DESCRIPTION)
    }
}

#[cfg(test)]
#[path = "tests/descriptions_tests.rs"]
mod tests;

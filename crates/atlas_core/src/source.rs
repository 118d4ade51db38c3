//! Event retrieval and mapping of backend rows into domain events.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    path::PathBuf,
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use shared::{
    domain::{Coordinate, Event, EventId, Facilitator},
    protocol::{RawDescription, RawEventRow, RawProfileStatus},
    taxonomy::DEFAULT_AVATAR,
};
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use crate::descriptions::DescriptionSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("event request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid source url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed event payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// External collaborator holding the live event rows.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Visible, live rows ordered by start time.
    async fn fetch_rows(&self) -> Result<Vec<RawEventRow>, SourceError>;
    /// Block status of the given profile ids; unknown ids are omitted.
    async fn profile_statuses(&self, ids: &[String]) -> Result<Vec<RawProfileStatus>, SourceError>;
}

/// A backend that serves both event rows and their descriptions.
pub trait EventCatalog: EventSource + DescriptionSource {}

impl<T: EventSource + DescriptionSource> EventCatalog for T {}

/// Fetches rows, resolves co-facilitator registration and maps to events.
pub async fn fetch_events<S: EventSource + ?Sized>(source: &S) -> Result<Vec<Event>, SourceError> {
    let rows = source.fetch_rows().await?;

    let ids: Vec<String> = rows
        .iter()
        .flat_map(|row| row.co_facilitators.iter().flatten())
        .filter_map(|facilitator| facilitator.id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let registered = if ids.is_empty() {
        HashSet::new()
    } else {
        match source.profile_statuses(&ids).await {
            Ok(statuses) => statuses
                .into_iter()
                .filter(|status| !status.is_blocked)
                .map(|status| status.id)
                .collect(),
            Err(err) => {
                warn!(error = %err, "profile lookup failed; co-facilitators treated as unregistered");
                HashSet::new()
            }
        }
    };

    Ok(map_rows(rows, &registered))
}

/// Fetch failures become an empty snapshot plus a logged diagnostic.
pub async fn load_events_or_empty<S: EventSource + ?Sized>(source: &S) -> Vec<Event> {
    match fetch_events(source).await {
        Ok(events) => {
            info!(count = events.len(), "loaded events");
            events
        }
        Err(err) => {
            error!(error = %err, "failed to load events");
            Vec::new()
        }
    }
}

pub fn map_rows(rows: Vec<RawEventRow>, registered_ids: &HashSet<String>) -> Vec<Event> {
    rows.into_iter()
        .filter_map(|row| map_row(row, registered_ids))
        .collect()
}

/// Maps one row. Rows from blocked organizers and rows with unusable
/// timestamps are dropped.
pub fn map_row(row: RawEventRow, registered_ids: &HashSet<String>) -> Option<Event> {
    if row.profiles.as_ref().is_some_and(|profile| profile.is_blocked) {
        return None;
    }

    let (Some(start), Some(end)) = (parse_instant(&row.start_time), parse_instant(&row.end_time))
    else {
        warn!(event_id = row.id, "dropping event with unparseable timestamps");
        return None;
    };

    let mut event = match Event::new(EventId(row.id), row.title, start, end) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "dropping event");
            return None;
        }
    };

    let (organizer, organizer_avatar, organizer_is_registered) = match row.profiles {
        Some(profile) => (
            non_empty(profile.full_name).unwrap_or_else(|| "Unknown".into()),
            profile.avatar_url.unwrap_or_default(),
            true,
        ),
        None => match non_empty(row.organizer) {
            Some(name) => (name.clone(), format!("{DEFAULT_AVATAR}{name}"), false),
            None => ("Unknown".into(), String::new(), false),
        },
    };

    event.coordinate = Coordinate::from_parts(row.lat, row.lng);
    event.category = non_empty(row.category).unwrap_or_else(|| "General".into());
    event.subcategory = non_empty(row.subcategory).unwrap_or_else(|| "General".into());
    event.location_type = non_empty(row.location_type);
    event.format = non_empty(row.format);
    event.link = non_empty(row.link);
    event.image_url = non_empty(row.image_url);
    event.city = row.city.unwrap_or_default();
    event.country = row.country.unwrap_or_default();
    event.continent = row.continent.unwrap_or_default();
    event.organizer = organizer;
    event.organizer_avatar = organizer_avatar;
    event.organizer_is_registered = organizer_is_registered;
    event.co_facilitators = row
        .co_facilitators
        .unwrap_or_default()
        .into_iter()
        .map(|raw| {
            let avatar =
                non_empty(raw.avatar).unwrap_or_else(|| format!("{DEFAULT_AVATAR}{}", raw.name));
            let is_registered = raw
                .id
                .as_ref()
                .is_some_and(|id| registered_ids.contains(id));
            Facilitator {
                name: raw.name,
                avatar,
                id: raw.id,
                is_registered,
            }
        })
        .collect();

    Some(event)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Accepts RFC 3339, Postgres-style `2024-05-01 10:00:00+00`, and naive
/// timestamps (taken as UTC).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }
    None
}

pub struct HttpEventSource {
    http: Client,
    base_url: Url,
}

impl HttpEventSource {
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_rows(&self) -> Result<Vec<RawEventRow>, SourceError> {
        let rows = self
            .http
            .get(self.base_url.join("events")?)
            .query(&[
                ("is_hidden", "false"),
                ("status", "live"),
                ("order", "start_time.asc"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows)
    }

    async fn profile_statuses(&self, ids: &[String]) -> Result<Vec<RawProfileStatus>, SourceError> {
        let statuses = self
            .http
            .get(self.base_url.join("profiles")?)
            .query(&[("ids", ids.join(","))])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(statuses)
    }
}

#[async_trait]
impl DescriptionSource for HttpEventSource {
    async fn description(&self, id: EventId) -> Result<Option<String>, SourceError> {
        let body: RawDescription = self
            .http
            .get(self.base_url.join(&format!("events/{}/description", id.0))?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.description)
    }
}

/// Local export: either a bare array of rows or an object with rows,
/// profile statuses and descriptions.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventDump {
    Rows(Vec<RawEventRow>),
    Full {
        events: Vec<RawEventRow>,
        #[serde(default)]
        profiles: Vec<RawProfileStatus>,
        #[serde(default)]
        descriptions: HashMap<i64, String>,
    },
}

pub struct JsonFileEventSource {
    path: PathBuf,
}

impl JsonFileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_dump(&self) -> Result<EventDump, SourceError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl EventSource for JsonFileEventSource {
    async fn fetch_rows(&self) -> Result<Vec<RawEventRow>, SourceError> {
        let rows = match self.read_dump().await? {
            EventDump::Rows(rows) => rows,
            EventDump::Full { events, .. } => events,
        };
        Ok(rows
            .into_iter()
            .filter(|row| row.status.as_deref().map_or(true, |status| status == "live"))
            .collect())
    }

    async fn profile_statuses(&self, ids: &[String]) -> Result<Vec<RawProfileStatus>, SourceError> {
        let profiles = match self.read_dump().await? {
            EventDump::Rows(_) => Vec::new(),
            EventDump::Full { profiles, .. } => profiles,
        };
        Ok(profiles
            .into_iter()
            .filter(|profile| ids.contains(&profile.id))
            .collect())
    }
}

#[async_trait]
impl DescriptionSource for JsonFileEventSource {
    async fn description(&self, id: EventId) -> Result<Option<String>, SourceError> {
        Ok(match self.read_dump().await? {
            EventDump::Rows(_) => None,
            EventDump::Full {
                mut descriptions, ..
            } => descriptions.remove(&id.0),
        })
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;

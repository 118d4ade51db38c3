//! Shareable event links.

use shared::domain::{Event, EventId};
use url::Url;

pub const EVENT_QUERY_PARAM: &str = "event";

pub fn find_by_id(events: &[Event], id: EventId) -> Option<&Event> {
    events.iter().find(|event| event.id == id)
}

/// Event id carried by a deep link, if the `event` parameter parses.
pub fn deep_link_event_id(url: &Url) -> Option<EventId> {
    url.query_pairs()
        .find(|(key, _)| key == EVENT_QUERY_PARAM)
        .and_then(|(_, value)| value.trim().parse::<i64>().ok())
        .map(EventId)
}

/// `base` with its query and fragment replaced by `?event=<id>`.
pub fn share_url(base: &Url, id: EventId) -> Url {
    let mut url = base.clone();
    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair(EVENT_QUERY_PARAM, &id.0.to_string());
    url
}

#[cfg(test)]
#[path = "tests/links_tests.rs"]
mod tests;

use chrono::{DateTime, Utc};
use shared::domain::{Coordinate, Event, EventId, Facilitator};

pub fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("timestamp")
        .with_timezone(&Utc)
}

pub fn event(id: i64, title: &str, start: &str, end: &str) -> Event {
    Event::new(EventId(id), title, at(start), at(end)).expect("event")
}

pub fn placed(id: i64, lat: f64, lng: f64) -> Event {
    event(
        id,
        &format!("Event {id}"),
        "2024-05-10T10:00:00Z",
        "2024-05-10T12:00:00Z",
    )
    .with_coordinate(Coordinate::new(lat, lng))
}

pub fn co_facilitator(name: &str, registered: bool) -> Facilitator {
    Facilitator {
        name: name.into(),
        avatar: format!("https://avatars.test/{name}"),
        id: registered.then(|| format!("id-{name}")),
        is_registered: registered,
    }
}

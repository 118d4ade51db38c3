use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(EventId);

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Pairs two optional halves; a lone latitude or longitude yields `None`.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(Self { lat, lng }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facilitator {
    pub name: String,
    pub avatar: String,
    pub id: Option<String>,
    pub is_registered: bool,
}

/// A single listed occurrence. Immutable once fetched; the lazily-loaded
/// description lives in a separate cache keyed by [`EventId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub coordinate: Option<Coordinate>,
    pub category: String,
    pub subcategory: String,
    pub location_type: Option<String>,
    pub format: Option<String>,
    pub organizer: String,
    pub organizer_avatar: String,
    pub organizer_is_registered: bool,
    pub co_facilitators: Vec<Facilitator>,
    pub city: String,
    pub country: String,
    pub continent: String,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

impl Event {
    pub fn new(
        id: EventId,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvertedInterval { id: id.0 });
        }

        Ok(Self {
            id,
            title: title.into(),
            start,
            end,
            coordinate: None,
            category: "General".into(),
            subcategory: "General".into(),
            location_type: None,
            format: None,
            organizer: "Unknown".into(),
            organizer_avatar: String::new(),
            organizer_is_registered: false,
            co_facilitators: Vec::new(),
            city: String::new(),
            country: String::new(),
            continent: String::new(),
            link: None,
            image_url: None,
        })
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_organizer(mut self, name: impl Into<String>, is_registered: bool) -> Self {
        self.organizer = name.into();
        self.organizer_is_registered = is_registered;
        self
    }

    pub fn with_co_facilitator(mut self, facilitator: Facilitator) -> Self {
        self.co_facilitators.push(facilitator);
        self
    }

    pub fn with_place(
        mut self,
        city: impl Into<String>,
        country: impl Into<String>,
        continent: impl Into<String>,
    ) -> Self {
        self.city = city.into();
        self.country = country.into();
        self.continent = continent.into();
        self
    }

    pub fn starts_in(&self, month: MonthKey) -> bool {
        MonthKey::from_date(self.start) == month
    }
}

/// Earliest and latest representable years. Keys outside this span would
/// have no calendar bounds.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Calendar month identified by year and zero-based month index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMonthKey")]
pub struct MonthKey {
    year: i32,
    month0: u32,
}

#[derive(Deserialize)]
struct RawMonthKey {
    year: i32,
    month0: u32,
}

impl TryFrom<RawMonthKey> for MonthKey {
    type Error = DomainError;

    fn try_from(raw: RawMonthKey) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month0)
    }
}

impl MonthKey {
    pub fn new(year: i32, month0: u32) -> Result<Self, DomainError> {
        if month0 > 11 {
            return Err(DomainError::MonthOutOfRange { month0 });
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DomainError::YearOutOfRange { year });
        }
        Ok(Self { year, month0 })
    }

    /// Clamped into `MIN_YEAR..=MAX_YEAR`.
    pub fn from_date(instant: DateTime<Utc>) -> Self {
        Self::clamped(i64::from(instant.year()) * 12 + i64::from(instant.month0()))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// Moves by `delta` months, carrying across year boundaries. Saturates
    /// at the first and last representable months.
    pub fn shift(self, delta: i32) -> Self {
        Self::clamped(i64::from(self.year) * 12 + i64::from(self.month0) + i64::from(delta))
    }

    fn clamped(absolute: i64) -> Self {
        let absolute = absolute.clamp(i64::from(MIN_YEAR) * 12, i64::from(MAX_YEAR) * 12 + 11);
        Self {
            year: absolute.div_euclid(12) as i32,
            month0: absolute.rem_euclid(12) as u32,
        }
    }

    /// First instant of day 1 through 23:59:59 of the last day, in UTC.
    pub fn bounds(self) -> (DateTime<Utc>, DateTime<Utc>) {
        let first = self.first_day();
        let next = first + Months::new(1);
        let end = next.and_time(NaiveTime::default()) - Duration::seconds(1);
        (
            Utc.from_utc_datetime(&first.and_time(NaiveTime::default())),
            Utc.from_utc_datetime(&end),
        )
    }

    fn first_day(self) -> NaiveDate {
        // Year and month are validated on construction, so the date exists.
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.year, self.month0)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = DomainError;

    /// Parses the `YEAR-MONTH0` form produced by `Display`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::MalformedMonthKey(raw.to_string());
        let (year, month0) = raw.trim().rsplit_once('-').ok_or_else(malformed)?;
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month0 = month0.parse::<u32>().map_err(|_| malformed())?;
        Self::new(year, month0)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;

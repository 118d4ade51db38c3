use super::*;

fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("timestamp")
        .with_timezone(&Utc)
}

#[test]
fn rejects_event_ending_before_start() {
    let err = Event::new(
        EventId(7),
        "Backwards",
        at("2024-03-02T10:00:00Z"),
        at("2024-03-01T10:00:00Z"),
    )
    .expect_err("inverted interval");
    assert_eq!(err, DomainError::InvertedInterval { id: 7 });
}

#[test]
fn coordinate_requires_both_halves() {
    assert_eq!(Coordinate::from_parts(Some(1.0), None), None);
    assert_eq!(Coordinate::from_parts(None, Some(1.0)), None);
    assert_eq!(
        Coordinate::from_parts(Some(1.0), Some(2.0)),
        Some(Coordinate::new(1.0, 2.0))
    );
}

#[test]
fn month_shift_carries_across_years() {
    let jan = MonthKey::new(2024, 0).expect("month");
    assert_eq!(jan.shift(-1), MonthKey::new(2023, 11).expect("month"));
    assert_eq!(jan.shift(13), MonthKey::new(2025, 1).expect("month"));
    assert_eq!(jan.shift(-25), MonthKey::new(2021, 11).expect("month"));
}

#[test]
fn month_bounds_cover_leap_february() {
    let feb = MonthKey::new(2024, 1).expect("month");
    let (start, end) = feb.bounds();
    assert_eq!(start, at("2024-02-01T00:00:00Z"));
    assert_eq!(end, at("2024-02-29T23:59:59Z"));
}

#[test]
fn december_bounds_end_on_new_years_eve() {
    let dec = MonthKey::new(2023, 11).expect("month");
    assert_eq!(dec.bounds().1, at("2023-12-31T23:59:59Z"));
}

#[test]
fn month_key_parses_display_form() {
    let key: MonthKey = "2024-10".parse().expect("parse");
    assert_eq!(key, MonthKey::new(2024, 10).expect("month"));
    assert_eq!(key.to_string(), "2024-10");
    assert!("2024-12".parse::<MonthKey>().is_err());
    assert!("march".parse::<MonthKey>().is_err());
}

#[test]
fn starts_in_uses_start_month_only() {
    let event = Event::new(
        EventId(1),
        "Retreat",
        at("2024-01-30T09:00:00Z"),
        at("2024-02-02T17:00:00Z"),
    )
    .expect("event");
    assert!(event.starts_in(MonthKey::new(2024, 0).expect("month")));
    assert!(!event.starts_in(MonthKey::new(2024, 1).expect("month")));
}

#[test]
fn month_key_rejects_years_without_a_calendar() {
    assert_eq!(
        MonthKey::new(300_000, 0),
        Err(DomainError::YearOutOfRange { year: 300_000 })
    );
    assert!(MonthKey::new(0, 5).is_err());
    assert!("300000-0".parse::<MonthKey>().is_err());
}

#[test]
fn last_representable_month_has_real_bounds() {
    let last = MonthKey::new(MAX_YEAR, 11).expect("month");
    let (start, end) = last.bounds();
    assert_eq!(start, at("9999-12-01T00:00:00Z"));
    assert_eq!(end, at("9999-12-31T23:59:59Z"));
    assert_eq!(last.shift(1), last);
    assert_eq!(MonthKey::new(MIN_YEAR, 0).expect("month").shift(-3).year(), MIN_YEAR);
}

#[test]
fn deserialization_validates_month_keys() {
    let key: MonthKey = serde_json::from_str(r#"{"year":2024,"month0":4}"#).expect("decode");
    assert_eq!(key, MonthKey::new(2024, 4).expect("month"));
    assert!(serde_json::from_str::<MonthKey>(r#"{"year":2024,"month0":12}"#).is_err());
    assert!(serde_json::from_str::<MonthKey>(r#"{"year":300000,"month0":0}"#).is_err());
}

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("event {id} ends before it starts")]
    InvertedInterval { id: i64 },
    #[error("month index {month0} is outside 0..=11")]
    MonthOutOfRange { month0: u32 },
    #[error("year {year} is outside the supported calendar range")]
    YearOutOfRange { year: i32 },
    #[error("malformed month key `{0}`; expected YEAR-MONTH0")]
    MalformedMonthKey(String),
}

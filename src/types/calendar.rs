use crate::types::errors::DateRangeError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};
use std::fmt;
use std::fmt::{Display, Formatter};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a calendar day, truncating any time component.
///
/// Accepts plain `YYYY-MM-DD`, RFC 3339 timestamps and `YYYY-MM-DD HH:MM:SS`.
/// Timestamps carrying an offset keep the day as written, not the UTC day.
pub fn parse_day(value: &str) -> Result<NaiveDate, DateRangeError> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.date_naive());
    }

    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .map(|timestamp| timestamp.date())
        .map_err(|_| DateRangeError::InvalidDate(value.to_string()))
}

/// Serde adapter for CSV date columns, see [`parse_day`].
pub fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_day(&value).map_err(de::Error::custom)
}

/// Inclusive range of calendar days used to filter loaded records.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::Inverted { start, end });
        }

        Ok(Self { start, end })
    }

    /// Builds a range from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        let start = NaiveDate::parse_from_str(start.trim(), DATE_FORMAT)
            .map_err(|_| DateRangeError::InvalidDate(start.to_string()))?;
        let end = NaiveDate::parse_from_str(end.trim(), DATE_FORMAT)
            .map_err(|_| DateRangeError::InvalidDate(end.to_string()))?;

        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}..={}", self.start.format(DATE_FORMAT), self.end.format(DATE_FORMAT))
    }
}

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DateRangeError {
    #[error("Date error: '{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Date error: range start [{start}] is after range end [{end}]")]
    Inverted {
        start: NaiveDate,
        end: NaiveDate
    }
}

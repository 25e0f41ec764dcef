mod amount;
mod calendar;
mod errors;
mod match_key;

pub use amount::deserialize_amount;
pub use calendar::{deserialize_day, parse_day, DateRange};
pub use errors::DateRangeError;
pub use match_key::MatchKey;

pub type RecordId = String;

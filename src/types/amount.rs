use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use std::str::FromStr;

/// Serde adapter for CSV amount columns.
///
/// Reads the raw text so the value never passes through a float.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;

    Decimal::from_str(value.trim())
        .map_err(|error| de::Error::custom(format!("'{value}' is not a valid amount: {error}")))
}

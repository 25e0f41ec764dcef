use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::types::calendar::DATE_FORMAT;

const KEY_DECIMAL_PLACES: u32 = 2;

/// Lookup key pairing a calendar day with an amount rounded to cents.
///
/// The key only drives candidate lookup. Discrepancies are always computed
/// from the full-precision amounts of the records themselves.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct MatchKey {
    date: NaiveDate,
    amount: Decimal
}

impl MatchKey {
    pub fn new(date: NaiveDate, amount: Decimal) -> Self {
        //NOTE: normalize() strips trailing zeros so 100, 100.0 and 100.00 produce identical keys
        Self {
            date,
            amount: amount.round_dp(KEY_DECIMAL_PLACES).normalize()
        }
    }
}

impl Display for MatchKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}_{:.2}", self.date.format(DATE_FORMAT), self.amount)
    }
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Record;
use crate::types::{deserialize_amount, deserialize_day, MatchKey, RecordId};

/// A line from an external bank statement, read positionally as `id, amount, date`.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct BankStatement {
    pub id: RecordId,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate
}

impl BankStatement {
    /// Statements are always keyed by magnitude.
    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(self.date, self.amount.abs())
    }
}

impl Record for BankStatement {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn day(&self) -> NaiveDate {
        self.date
    }
}

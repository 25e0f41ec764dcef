use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Record, TransactionType};
use crate::types::{deserialize_amount, deserialize_day, MatchKey, RecordId};

/// A transaction as recorded by the internal system.
///
/// Rows are read positionally as `id, amount, type, date`.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct Transaction {
    /// Identifier assigned by the internal system.
    pub id: RecordId,
    /// Signed amount; some systems record debits as negative values.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Day the transaction took place.
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate
}

impl Transaction {
    /// Amount used to probe the bank statement index.
    ///
    /// Debits compare by magnitude. Credits keep their sign, so a negative
    /// credit can never meet a bank statement key.
    pub fn comparison_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Debit => self.amount.abs(),
            TransactionType::Credit => self.amount
        }
    }

    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(self.date, self.comparison_amount())
    }
}

impl Record for Transaction {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn day(&self) -> NaiveDate {
        self.date
    }
}

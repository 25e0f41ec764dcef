mod bank_statement;
mod report;
mod transaction;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use bank_statement::BankStatement;
pub use report::{Discrepancy, ReconciliationReport};
pub use transaction::Transaction;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    #[serde(alias = "credit", alias = "Credit")]
    Credit,
    #[serde(alias = "debit", alias = "Debit")]
    Debit
}

/// A dated row loaded from a record source.
pub trait Record {
    fn record_id(&self) -> &str;
    fn day(&self) -> NaiveDate;
}

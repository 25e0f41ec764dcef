mod csv_source;
mod errors;

use std::path::{Path, PathBuf};

use crate::models::{BankStatement, Transaction};
use crate::types::DateRange;

pub use csv_source::CsvRecordSource;
pub use errors::{MalformedRecord, SourceError};

/// Supplies both sides of a reconciliation, already filtered to a date range.
///
/// Individual bad rows are skipped by implementations; only a source that
/// cannot be read at all produces an error.
pub trait RecordSource: Send + Sync + 'static {
    fn load_transactions(&self, path: &Path, range: DateRange) -> Result<Vec<Transaction>, SourceError>;

    /// Loads every path in order and concatenates the results.
    fn load_bank_statements(&self, paths: &[PathBuf], range: DateRange) -> Result<Vec<BankStatement>, SourceError>;
}

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::models::{BankStatement, Record, Transaction};
use crate::source::errors::{MalformedRecord, SourceError};
use crate::source::RecordSource;
use crate::types::DateRange;

/// Reads records from headered CSV files with positional columns.
///
/// System transactions are `id,amount,type,date` and bank statements are
/// `id,amount,date`. The header row is skipped regardless of its names and
/// trailing extra columns are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRecordSource;

impl CsvRecordSource {
    pub fn new() -> Self {
        Self
    }

    fn read_records<T>(&self, path: &Path, range: DateRange) -> Result<Vec<T>, SourceError>
    where
        T: DeserializeOwned + Record,
    {
        let file = File::open(path).map_err(|error| SourceError::open(path, error))?;

        //NOTE: flexible(true) lets short rows through the reader so they are reported as malformed records
        //      rather than failing the whole file.
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let header = reader.headers().map_err(|error| SourceError::read(path, error))?;

        if header.is_empty() {
            return Err(SourceError::missing_header(path));
        }

        let mut records = Vec::new();
        let mut skipped = 0usize;
        let mut filtered = 0usize;

        for result in reader.records() {
            let row = match result {
                Ok(row) => row,
                Err(error) if error.is_io_error() => return Err(SourceError::read(path, error)),
                Err(error) => {
                    skipped += 1;
                    let line = error.position().map(|position| position.line()).unwrap_or_default();
                    warn!("{}", MalformedRecord { path: path.to_path_buf(), line, reason: error.to_string() });
                    continue;
                }
            };

            match parse_row::<T>(&row) {
                Ok(record) if range.contains(record.day()) => records.push(record),
                Ok(record) => {
                    filtered += 1;
                    trace!("Record [{}] dated {} is outside {range}", record.record_id(), record.day());
                }
                Err(reason) => {
                    skipped += 1;
                    let line = row.position().map(|position| position.line()).unwrap_or_default();
                    warn!("{}", MalformedRecord { path: path.to_path_buf(), line, reason });
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {skipped} malformed record(s) in [{}]", path.display());
        }

        debug!("Loaded {} record(s) from [{}], {filtered} outside {range}", records.len(), path.display());

        Ok(records)
    }
}

fn parse_row<T: DeserializeOwned>(row: &StringRecord) -> Result<T, String> {
    row.deserialize::<T>(None).map_err(|error| error.to_string())
}

impl RecordSource for CsvRecordSource {
    fn load_transactions(&self, path: &Path, range: DateRange) -> Result<Vec<Transaction>, SourceError> {
        self.read_records(path, range)
    }

    fn load_bank_statements(&self, paths: &[PathBuf], range: DateRange) -> Result<Vec<BankStatement>, SourceError> {
        let mut statements = Vec::new();

        for path in paths {
            statements.extend(self.read_records::<BankStatement>(path, range)?);
        }

        Ok(statements)
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::{spawn_blocking, JoinHandle};
use tokio::time::timeout;
use tracing::{error, info};

use crate::engine::errors::EngineError;
use crate::engine::matcher::reconcile;
use crate::models::{BankStatement, ReconciliationReport, Transaction};
use crate::source::{RecordSource, SourceError};
use crate::types::DateRange;

/// Loads both sides of a reconciliation concurrently, then matches them.
pub struct ReconciliationEngine<S: RecordSource> {
    source: Arc<S>,
    load_timeout: Option<Duration>
}

impl<S: RecordSource> ReconciliationEngine<S> {
    /// Creates a new engine reading from the provided source.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            load_timeout: None
        }
    }

    /// Aborts the run if loading takes longer than `limit`.
    pub fn with_load_timeout(mut self, limit: Duration) -> Self {
        self.load_timeout = Some(limit);
        self
    }

    /// Runs a full reconciliation for the given sources and date range.
    ///
    /// Either load failing aborts the run; no partial report is produced.
    pub async fn run(&self, system_path: &Path, bank_paths: &[PathBuf], range: DateRange) -> Result<ReconciliationReport, EngineError> {
        let timer = Instant::now();

        let loaded = match self.load_timeout {
            Some(limit) => timeout(limit, self.load(system_path, bank_paths, range))
                .await
                .unwrap_or_else(|_| Err(EngineError::Timeout(limit))),
            None => self.load(system_path, bank_paths, range).await
        };

        let (transactions, statements) = loaded.inspect_err(|error| error!("{error}"))?;

        info!(
            "Loaded {} system transaction(s) and {} bank statement(s) within {range} in {:?}",
            transactions.len(),
            statements.len(),
            timer.elapsed()
        );

        //NOTE: Matching is CPU-only and short; it runs inline once both collections are materialized.
        let report = reconcile(&transactions, &statements);

        info!(
            "Matched {} pair(s) with {} discrepancy(ies) totalling {}, {} system and {} bank record(s) unmatched",
            report.matched(),
            report.discrepancies().len(),
            report.discrepancy_sum(),
            report.unmatched_system().len(),
            report.unmatched_bank().len()
        );

        Ok(report)
    }

    async fn load(&self, system_path: &Path, bank_paths: &[PathBuf], range: DateRange) -> Result<(Vec<Transaction>, Vec<BankStatement>), EngineError> {
        let transactions = self.spawn_transaction_loader(system_path.to_path_buf(), range);
        let statements = self.spawn_statement_loader(bank_paths.to_vec(), range);

        tokio::try_join!(join_load(transactions), join_load(statements))
    }

    fn spawn_transaction_loader(&self, path: PathBuf, range: DateRange) -> JoinHandle<Result<Vec<Transaction>, SourceError>> {
        let source = self.source.clone();
        spawn_blocking(move || source.load_transactions(&path, range))
    }

    fn spawn_statement_loader(&self, paths: Vec<PathBuf>, range: DateRange) -> JoinHandle<Result<Vec<BankStatement>, SourceError>> {
        let source = self.source.clone();
        spawn_blocking(move || source.load_bank_statements(&paths, range))
    }
}

async fn join_load<T>(handle: JoinHandle<Result<T, SourceError>>) -> Result<T, EngineError> {
    Ok(handle.await??)
}

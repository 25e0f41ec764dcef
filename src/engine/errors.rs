use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinError;

use crate::source::SourceError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Reconciliation aborted: {0}")]
    Source(#[from] SourceError),
    #[error("Reconciliation aborted: load task failed: {0}")]
    Task(#[from] JoinError),
    #[error("Reconciliation aborted: loading did not finish within {0:?}")]
    Timeout(Duration)
}

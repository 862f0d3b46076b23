//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::{AttemptError, BankError, StateCode};
use storage::repository::StorageError;

/// Errors emitted by the training loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrainingError {
    #[error("no question set loaded for state {0}")]
    UnknownState(StateCode),
    #[error(transparent)]
    Bank(BankError),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}

impl From<BankError> for TrainingError {
    fn from(err: BankError) -> Self {
        match err {
            BankError::UnknownState(state) => TrainingError::UnknownState(state),
            other => TrainingError::Bank(other),
        }
    }
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

use async_trait::async_trait;

use drill_core::model::{CorrectAnswerField, QuestionBank, QuestionRecord, StateCode, UserId};
use storage::repository::{ProgressRecord, ProgressRepository, StorageError};

/// Reads succeed with nothing stored; every write fails.
pub struct FailingRepository;

#[async_trait]
impl ProgressRepository for FailingRepository {
    async fn load_progress(&self, _user: &UserId) -> Result<Option<ProgressRecord>, StorageError> {
        Ok(None)
    }

    async fn save_progress(
        &self,
        _user: &UserId,
        _record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

/// `n` questions `Q1..Qn` in the general category, all answered by `B`.
pub fn bank_with(state: &StateCode, n: usize) -> QuestionBank {
    let records = (1..=n).map(|i| QuestionRecord {
        id: Some(format!("Q{i}")),
        prompt: Some(format!("Prompt {i}")),
        options: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
        correct: Some(CorrectAnswerField::Code("B".into())),
        ..QuestionRecord::default()
    });
    QuestionBank::from_records(state.clone(), records).unwrap()
}

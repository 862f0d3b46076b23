use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drill_core::model::{
    AttemptError, BankError, Category, ProgressError, QuestionId, TestAttempt, TestNumber,
    TrainingProgress, UserId,
};
use drill_core::{ProgressPolicy, ProgressTracker};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error("stored progress is invalid: {0}")]
    InvalidProgress(#[from] ProgressError),

    #[error("stored attempt is invalid: {0}")]
    InvalidAttempt(#[from] AttemptError),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape of [`TrainingProgress`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub correct: u32,
    pub incorrect: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    /// Oldest first.
    pub recent: Vec<QuestionId>,
    pub total_correct_all_time: u32,
    #[serde(default)]
    pub category_correct: BTreeMap<Category, u32>,
}

/// Persisted shape of a [`TestAttempt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub test_number: TestNumber,
    pub score: u32,
    pub total: u32,
    pub completed_at: DateTime<Utc>,
}

/// Everything persisted for one user's progress.
///
/// This mirrors the domain `ProgressTracker` so adapters can store it
/// without leaking storage concerns into the domain layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub training: TrainingRecord,
    /// Completion order, oldest first.
    pub attempts: Vec<AttemptRecord>,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_tracker(tracker: &ProgressTracker) -> Self {
        let training = tracker.training();
        Self {
            training: TrainingRecord {
                correct: training.correct(),
                incorrect: training.incorrect(),
                current_streak: training.current_streak(),
                best_streak: training.best_streak(),
                recent: training.recent().cloned().collect(),
                total_correct_all_time: training.total_correct_all_time(),
                category_correct: training.category_counts().clone(),
            },
            attempts: tracker
                .attempts()
                .iter()
                .map(|a| AttemptRecord {
                    test_number: a.test_number(),
                    score: a.score(),
                    total: a.total(),
                    completed_at: a.completed_at(),
                })
                .collect(),
        }
    }

    /// Convert the record back into a domain tracker governed by `policy`.
    ///
    /// When the stored history is longer than the policy window (the window
    /// was shrunk since it was saved), only the newest ids are kept.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidProgress` or `StorageError::InvalidAttempt`
    /// if the stored values break domain invariants.
    pub fn into_tracker(self, policy: ProgressPolicy) -> Result<ProgressTracker, StorageError> {
        let t = self.training;
        let window = policy.recent_window;
        let skip = t.recent.len().saturating_sub(window);
        let recent = t.recent.into_iter().skip(skip).collect();

        let training = TrainingProgress::from_persisted(
            t.correct,
            t.incorrect,
            t.current_streak,
            t.best_streak,
            recent,
            t.total_correct_all_time,
            t.category_correct,
            window,
        )?;

        let attempts = self
            .attempts
            .into_iter()
            .map(|a| TestAttempt::with_total(a.test_number, a.score, a.total, a.completed_at))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProgressTracker::from_parts(policy, training, attempts))
    }
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Repository contract for per-user progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the last saved progress for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails. A user with nothing saved
    /// yields `Ok(None)`.
    async fn load_progress(&self, user: &UserId) -> Result<Option<ProgressRecord>, StorageError>;

    /// Replace the stored progress for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_progress(&self, user: &UserId, record: &ProgressRecord)
    -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<UserId, ProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self, user: &UserId) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(user).cloned())
    }

    async fn save_progress(
        &self,
        user: &UserId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(user.clone(), record.clone());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::time::fixed_now;

    fn user() -> UserId {
        UserId::new("driver-1").unwrap()
    }

    fn populated_tracker() -> ProgressTracker {
        let mut tracker = ProgressTracker::default();
        for n in 0..12 {
            tracker.record_training_answer(QuestionId::new(format!("Q{n}")).unwrap(), n != 3);
        }
        tracker.record_test_attempt(
            TestAttempt::new(TestNumber::new(1).unwrap(), 41, fixed_now()).unwrap(),
        );
        tracker
    }

    #[tokio::test]
    async fn round_trips_tracker_through_memory() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_progress(&user()).await.unwrap().is_none());

        let tracker = populated_tracker();
        repo.save_progress(&user(), &ProgressRecord::from_tracker(&tracker))
            .await
            .unwrap();

        let loaded = repo
            .load_progress(&user())
            .await
            .unwrap()
            .unwrap()
            .into_tracker(ProgressPolicy::default())
            .unwrap();
        assert_eq!(loaded, tracker);
    }

    #[test]
    fn shrunk_window_keeps_newest_ids() {
        let record = ProgressRecord::from_tracker(&populated_tracker());
        let policy = ProgressPolicy {
            recent_window: 2,
            ..ProgressPolicy::default()
        };
        let tracker = record.into_tracker(policy).unwrap();
        let recent: Vec<_> = tracker.training().recent().map(QuestionId::as_str).collect();
        assert_eq!(recent, vec!["Q10", "Q11"]);
    }

    #[test]
    fn invalid_record_is_rejected() {
        let mut record = ProgressRecord::from_tracker(&populated_tracker());
        record.attempts[0].score = 99;
        assert!(matches!(
            record.into_tracker(ProgressPolicy::default()),
            Err(StorageError::InvalidAttempt(_))
        ));

        let mut record = ProgressRecord::default();
        record.training.current_streak = 3;
        assert!(matches!(
            record.into_tracker(ProgressPolicy::default()),
            Err(StorageError::InvalidProgress(_))
        ));
    }

    #[test]
    fn record_serializes_to_json() {
        let record = ProgressRecord::from_tracker(&populated_tracker());
        let json = serde_json::to_string(&record).unwrap();
        let back: ProgressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}

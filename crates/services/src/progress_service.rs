use std::sync::Arc;

use drill_core::model::{TestAttempt, TestNumber, UserId};
use drill_core::{Clock, ProgressPolicy, ProgressTracker};
use storage::repository::{ProgressRecord, ProgressRepository};

use crate::error::ProgressServiceError;

/// Moves trackers between the persistence layer and the in-memory model.
///
/// Training writes go through [`ProgressService::persist`]: a failed save is
/// logged and play continues on the in-memory state. One-shot operations
/// (test attempts, resets) report failed writes to the caller.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    policy: ProgressPolicy,
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, policy: ProgressPolicy, repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            policy,
            repo,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &ProgressPolicy {
        &self.policy
    }

    /// Load the user's tracker, or a fresh one if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the backend fails or the
    /// stored record breaks domain invariants.
    pub async fn load(&self, user: &UserId) -> Result<ProgressTracker, ProgressServiceError> {
        match self.repo.load_progress(user).await? {
            Some(record) => Ok(record.into_tracker(self.policy.clone())?),
            None => {
                tracing::debug!(user = %user, "no saved progress, starting fresh");
                Ok(ProgressTracker::new(self.policy.clone()))
            }
        }
    }

    /// Save and report failures.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the write fails.
    pub async fn save(
        &self,
        user: &UserId,
        tracker: &ProgressTracker,
    ) -> Result<(), ProgressServiceError> {
        self.repo
            .save_progress(user, &ProgressRecord::from_tracker(tracker))
            .await?;
        Ok(())
    }

    /// Save, logging instead of returning failures.
    pub async fn persist(&self, user: &UserId, tracker: &ProgressTracker) {
        if let Err(e) = self.save(user, tracker).await {
            tracing::warn!(user = %user, "failed to persist progress: {e}");
        }
    }

    /// Append a finished practice test stamped with the service clock, then save.
    ///
    /// The attempt stays on `tracker` even when the write fails.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Attempt` if `score` exceeds the test length,
    /// or `ProgressServiceError::Storage` if the write fails.
    pub async fn record_test_attempt(
        &self,
        user: &UserId,
        tracker: &mut ProgressTracker,
        test: TestNumber,
        score: u32,
    ) -> Result<TestAttempt, ProgressServiceError> {
        let attempt = TestAttempt::new(test, score, self.clock.now())?;
        tracker.record_test_attempt(attempt.clone());
        tracing::info!(user = %user, test = %test, score, "recorded test attempt");
        self.save(user, tracker).await?;
        Ok(attempt)
    }

    /// Overwrite the user's stored progress with an empty record.
    ///
    /// Nothing is loaded first, so a stored record that no longer passes
    /// validation can still be wiped.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the write fails.
    pub async fn reset_all_data(
        &self,
        user: &UserId,
    ) -> Result<ProgressTracker, ProgressServiceError> {
        let tracker = ProgressTracker::new(self.policy.clone());
        self.save(user, &tracker).await?;
        tracing::info!(user = %user, "reset all progress");
        Ok(tracker)
    }
}

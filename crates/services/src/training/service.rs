use std::sync::Arc;

use drill_core::ProgressTracker;
use drill_core::model::{OptionIndex, Question, QuestionBank, StateCode, UserId};

use super::session::{AnswerFeedback, TrainingSession};
use crate::error::TrainingError;
use crate::progress_service::ProgressService;

/// Orchestrates training sessions against the shared bank and persisted progress.
#[derive(Clone)]
pub struct TrainingLoopService {
    bank: Arc<QuestionBank>,
    progress: ProgressService,
}

impl TrainingLoopService {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, progress: ProgressService) -> Self {
        Self { bank, progress }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Load the user's progress and open a drill over `state`.
    ///
    /// # Errors
    ///
    /// Returns `TrainingError::UnknownState` for a state the bank never loaded,
    /// or `TrainingError::Progress` if saved progress cannot be read.
    pub async fn start_session(
        &self,
        user: UserId,
        state: StateCode,
    ) -> Result<TrainingSession, TrainingError> {
        if !self.bank.contains_state(&state) {
            return Err(TrainingError::UnknownState(state));
        }
        let tracker = self.progress.load(&user).await?;
        tracing::info!(user = %user, state = %state, "training session started");
        TrainingSession::new(user, state, Arc::clone(&self.bank), tracker)
    }

    /// Draw the next question using the thread-local RNG.
    ///
    /// # Errors
    ///
    /// See [`TrainingSession::next_question`].
    pub fn next_question<'s>(
        &self,
        session: &'s mut TrainingSession,
    ) -> Result<Option<&'s Question>, TrainingError> {
        session.next_question(&mut rand::rng())
    }

    /// Answer the current question and persist the updated progress.
    ///
    /// Ignored answers are not persisted. A failed write is logged and the
    /// feedback is still returned.
    pub async fn answer(
        &self,
        session: &mut TrainingSession,
        chosen: OptionIndex,
    ) -> Option<AnswerFeedback> {
        let feedback = session.answer(chosen)?;
        if feedback.unlocked_practice_tests {
            tracing::info!(user = %session.user(), "practice tests unlocked");
        }
        self.progress.persist(session.user(), session.tracker()).await;
        Some(feedback)
    }

    /// Close the drill, persist, and hand the tracker back.
    pub async fn end_session(&self, mut session: TrainingSession) -> ProgressTracker {
        session.end();
        self.progress.persist(session.user(), session.tracker()).await;
        tracing::info!(user = %session.user(), "training session ended");
        session.into_tracker()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingRepository, bank_with};
    use drill_core::ProgressPolicy;
    use drill_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    const RIGHT: OptionIndex = OptionIndex::ALL[1];

    fn user() -> UserId {
        UserId::new("driver").unwrap()
    }

    fn zz() -> StateCode {
        StateCode::new("ZZ").unwrap()
    }

    fn service_with(repo: Arc<dyn storage::ProgressRepository>) -> TrainingLoopService {
        let progress = ProgressService::new(fixed_clock(), ProgressPolicy::default(), repo);
        TrainingLoopService::new(Arc::new(bank_with(&zz(), 12)), progress)
    }

    #[tokio::test]
    async fn answers_are_persisted_between_sessions() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = service_with(repo);

        let mut session = service.start_session(user(), zz()).await.unwrap();
        for _ in 0..3 {
            service.next_question(&mut session).unwrap();
            service.answer(&mut session, RIGHT).await.unwrap();
        }
        let tracker = service.end_session(session).await;
        assert_eq!(tracker.training().answered(), 0);

        let resumed = service.start_session(user(), zz()).await.unwrap();
        assert_eq!(resumed.tracker().training().total_correct_all_time(), 3);
        assert_eq!(resumed.tracker().training().recent().len(), 3);
    }

    #[tokio::test]
    async fn unknown_state_fails_before_loading() {
        let service = service_with(Arc::new(InMemoryRepository::new()));
        let err = service
            .start_session(user(), StateCode::new("CA").unwrap())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, TrainingError::UnknownState(_)));
    }

    #[tokio::test]
    async fn storage_failure_does_not_block_training() {
        let service = service_with(Arc::new(FailingRepository));
        let mut session = service.start_session(user(), zz()).await.unwrap();

        service.next_question(&mut session).unwrap();
        let feedback = service.answer(&mut session, RIGHT).await.unwrap();
        assert!(feedback.is_correct);
        assert_eq!(feedback.current_streak, 1);

        let tracker = service.end_session(session).await;
        assert_eq!(tracker.training().total_correct_all_time(), 1);
    }

    #[tokio::test]
    async fn second_answer_is_not_recorded() {
        let service = service_with(Arc::new(InMemoryRepository::new()));
        let mut session = service.start_session(user(), zz()).await.unwrap();
        service.next_question(&mut session).unwrap();

        assert!(service.answer(&mut session, RIGHT).await.is_some());
        assert!(service.answer(&mut session, RIGHT).await.is_none());
        assert_eq!(session.tracker().training().correct(), 1);
    }
}

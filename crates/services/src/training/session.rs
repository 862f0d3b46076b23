use std::sync::Arc;

use rand::Rng;

use drill_core::ProgressTracker;
use drill_core::model::{OptionIndex, Question, QuestionBank, QuestionId, StateCode, UserId};

use super::selector::pick_training_question;
use crate::error::TrainingError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where a single training interaction stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingPhase {
    /// No question on screen.
    Idle,
    /// A question is shown and waiting for its first answer.
    AwaitingAnswer(Question),
    /// The shown question has been answered; later selections are ignored.
    Answered {
        question: Question,
        chosen: OptionIndex,
    },
}

/// What the caller shows after an answer is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub chosen: OptionIndex,
    pub correct_option: OptionIndex,
    pub is_correct: bool,
    pub current_streak: u32,
    pub best_streak: u32,
    /// This answer crossed the practice-test unlock threshold.
    pub unlocked_practice_tests: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One user's training drill over a state's question set.
///
/// The session owns the user's `ProgressTracker` for its lifetime; take it
/// back with [`TrainingSession::into_tracker`] when the drill is over.
pub struct TrainingSession {
    user: UserId,
    state: StateCode,
    bank: Arc<QuestionBank>,
    tracker: ProgressTracker,
    phase: TrainingPhase,
}

impl TrainingSession {
    /// Start a drill for `state`.
    ///
    /// # Errors
    ///
    /// Returns `TrainingError::UnknownState` if the bank has no entry for `state`.
    pub fn new(
        user: UserId,
        state: StateCode,
        bank: Arc<QuestionBank>,
        tracker: ProgressTracker,
    ) -> Result<Self, TrainingError> {
        if !bank.contains_state(&state) {
            return Err(TrainingError::UnknownState(state));
        }
        Ok(Self {
            user,
            state,
            bank,
            tracker,
            phase: TrainingPhase::Idle,
        })
    }

    #[must_use]
    pub fn user(&self) -> &UserId {
        &self.user
    }

    #[must_use]
    pub fn state(&self) -> &StateCode {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> &TrainingPhase {
        &self.phase
    }

    #[must_use]
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    #[must_use]
    pub fn into_tracker(self) -> ProgressTracker {
        self.tracker
    }

    /// The question currently on screen, answered or not.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            TrainingPhase::Idle => None,
            TrainingPhase::AwaitingAnswer(q) | TrainingPhase::Answered { question: q, .. } => {
                Some(q)
            }
        }
    }

    /// Move to the next question.
    ///
    /// An unanswered question stays on screen; otherwise a fresh one is drawn
    /// avoiding the recent-history window. `Ok(None)` means the state has no
    /// questions and the session returns to idle.
    ///
    /// # Errors
    ///
    /// Returns `TrainingError` if the bank no longer knows this state.
    pub fn next_question<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<&Question>, TrainingError> {
        if matches!(self.phase, TrainingPhase::AwaitingAnswer(_)) {
            return Ok(self.current_question());
        }

        let exclude = self.tracker.recent_exclusions();
        let picked = pick_training_question(&self.bank, &self.state, &exclude, rng)?.cloned();
        self.phase = match picked {
            Some(question) => TrainingPhase::AwaitingAnswer(question),
            None => TrainingPhase::Idle,
        };
        Ok(self.current_question())
    }

    /// Answer the question on screen. Only the first answer counts; returns
    /// `None` when there is nothing awaiting an answer.
    pub fn answer(&mut self, chosen: OptionIndex) -> Option<AnswerFeedback> {
        let TrainingPhase::AwaitingAnswer(question) = &self.phase else {
            return None;
        };
        let question = question.clone();

        let was_unlocked = self.tracker.is_onboarding_complete();
        let is_correct = question.is_correct(chosen);
        self.tracker.record_question_answer(&question, is_correct);

        let training = self.tracker.training();
        let feedback = AnswerFeedback {
            question_id: question.id().clone(),
            chosen,
            correct_option: question.correct(),
            is_correct,
            current_streak: training.current_streak(),
            best_streak: training.best_streak(),
            unlocked_practice_tests: !was_unlocked && self.tracker.is_onboarding_complete(),
        };

        self.phase = TrainingPhase::Answered { question, chosen };
        Some(feedback)
    }

    /// End the drill: session counters reset, lifetime progress kept.
    pub fn end(&mut self) {
        self.tracker.reset_training_session();
        self.phase = TrainingPhase::Idle;
    }
}

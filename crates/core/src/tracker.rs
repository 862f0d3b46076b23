//! Progress tracker: one user's training counters plus their practice-test history.
//!
//! The tracker is an owned value. Callers load it, mutate it for each answered
//! question or finished test, and hand it back to persistence. It never holds
//! the user's identity or chosen state; those belong to other collaborators and
//! are therefore untouched by [`ProgressTracker::reset_all_data`].

use crate::model::{
    Category, Question, QuestionId, TestAttempt, TestAttemptStats, TestNumber, TrainingProgress,
};
use crate::policy::ProgressPolicy;

/// Correct answers in one category against the dashboard target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryProgress {
    pub category: Category,
    /// Capped at `target`.
    pub correct: u32,
    pub target: u32,
}

impl CategoryProgress {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.correct >= self.target
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTracker {
    policy: ProgressPolicy,
    training: TrainingProgress,
    attempts: Vec<TestAttempt>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(policy: ProgressPolicy) -> Self {
        Self::from_parts(policy, TrainingProgress::new(), Vec::new())
    }

    /// Rebuild a tracker from previously persisted state. `attempts` must be in
    /// completion order, oldest first.
    #[must_use]
    pub fn from_parts(
        policy: ProgressPolicy,
        training: TrainingProgress,
        attempts: Vec<TestAttempt>,
    ) -> Self {
        Self {
            policy,
            training,
            attempts,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &ProgressPolicy {
        &self.policy
    }

    #[must_use]
    pub fn training(&self) -> &TrainingProgress {
        &self.training
    }

    /// Attempt history, oldest first.
    #[must_use]
    pub fn attempts(&self) -> &[TestAttempt] {
        &self.attempts
    }

    /// Ids to exclude from the next training draw.
    #[must_use]
    pub fn recent_exclusions(&self) -> Vec<QuestionId> {
        self.training.recent_window(self.policy.recent_window)
    }

    //
    // ─── MUTATIONS ─────────────────────────────────────────────────────────────
    //

    pub fn record_training_answer(&mut self, question_id: QuestionId, is_correct: bool) {
        self.training
            .record(question_id, is_correct, self.policy.recent_window);
    }

    /// Like [`Self::record_training_answer`] but also credits the question's category.
    pub fn record_question_answer(&mut self, question: &Question, is_correct: bool) {
        self.record_training_answer(question.id().clone(), is_correct);
        if is_correct {
            self.training.credit_category(question.category());
        }
    }

    /// End the current training session without touching unlock progress.
    pub fn reset_training_session(&mut self) {
        self.training.reset_session();
    }

    pub fn record_test_attempt(&mut self, attempt: TestAttempt) {
        self.attempts.push(attempt);
    }

    /// Wipe training stats and every test attempt.
    pub fn reset_all_data(&mut self) {
        self.training = TrainingProgress::new();
        self.attempts.clear();
    }

    //
    // ─── DERIVED ───────────────────────────────────────────────────────────────
    //

    /// `referral_unlocked` comes from the identity collaborator and only matters
    /// for tests the policy marks as referral-gated.
    #[must_use]
    pub fn is_test_unlocked(&self, test: TestNumber, referral_unlocked: bool) -> bool {
        let trained = self.training.total_correct_all_time() >= self.policy.unlock_threshold(test);
        if self.policy.requires_referral(test) {
            trained && referral_unlocked
        } else {
            trained
        }
    }

    /// Enough training has been done to open the first practice test.
    #[must_use]
    pub fn is_onboarding_complete(&self) -> bool {
        self.training.total_correct_all_time() >= self.policy.unlock_thresholds[0]
    }

    /// Estimated chance of passing the real exam, 0–100.
    ///
    /// A decaying weighted mean of the newest attempts' percentages, blended
    /// with the best percentage ever. Depends only on the stored history.
    #[must_use]
    pub fn pass_probability(&self) -> u8 {
        let rules = &self.policy.pass_probability;
        if self.attempts.is_empty() {
            return 0;
        }

        let mut weight = 1.0_f64;
        let mut weighted_sum = 0.0_f64;
        let mut weight_total = 0.0_f64;
        for attempt in self.attempts.iter().rev().take(rules.recent_attempts) {
            weighted_sum += weight * attempt.percent();
            weight_total += weight;
            weight *= rules.recency_decay;
        }
        let recent = weighted_sum / weight_total;

        let best = self
            .attempts
            .iter()
            .map(TestAttempt::percent)
            .fold(0.0_f64, f64::max);

        let blended = recent * (1.0 - rules.best_score_weight) + best * rules.best_score_weight;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = blended.round().clamp(0.0, 100.0) as u8;
        rounded
    }

    #[must_use]
    pub fn test_attempt_stats(&self, test: TestNumber) -> Option<TestAttemptStats> {
        TestAttemptStats::from_attempts(test, &self.attempts)
    }

    #[must_use]
    pub fn latest_attempt(&self, test: TestNumber) -> Option<&TestAttempt> {
        self.attempts.iter().rev().find(|a| a.test_number() == test)
    }

    /// Progress toward the policy target for each listed category.
    #[must_use]
    pub fn category_progress(&self, categories: &[Category]) -> Vec<CategoryProgress> {
        let target = self.policy.category_target;
        categories
            .iter()
            .map(|category| CategoryProgress {
                category: category.clone(),
                correct: self.training.category_correct(category).min(target),
                target,
            })
            .collect()
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(ProgressPolicy::default())
    }
}

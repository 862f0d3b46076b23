use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::TestNumber;

/// Questions in a full practice test.
pub const QUESTIONS_PER_TEST: u32 = 50;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("score {score} exceeds the {total} questions in the test")]
    ScoreOutOfRange { score: u32, total: u32 },

    #[error("a test must contain at least one question")]
    EmptyTest,
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Classification of a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestOutcome {
    /// Every question answered correctly.
    Mastered,
    /// At or above the pass mark.
    Passed,
    /// Below the pass mark.
    KeepPracticing,
}

impl TestOutcome {
    #[must_use]
    pub fn is_pass(self) -> bool {
        matches!(self, TestOutcome::Mastered | TestOutcome::Passed)
    }

    /// Classify a score against a pass mark given in whole percent.
    #[must_use]
    pub fn classify(score: u32, total: u32, pass_mark_percent: u8) -> Self {
        if total > 0 && score >= total {
            return TestOutcome::Mastered;
        }
        // score * 100 >= total * mark, kept in integers so 35/50 at 70% passes exactly
        if u64::from(score) * 100 >= u64::from(total) * u64::from(pass_mark_percent) {
            TestOutcome::Passed
        } else {
            TestOutcome::KeepPracticing
        }
    }
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// One completed practice test. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestAttempt {
    test_number: TestNumber,
    score: u32,
    total: u32,
    completed_at: DateTime<Utc>,
}

impl TestAttempt {
    /// Record a finished full-length test.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::ScoreOutOfRange` if `score` exceeds [`QUESTIONS_PER_TEST`].
    pub fn new(
        test_number: TestNumber,
        score: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        Self::with_total(test_number, score, QUESTIONS_PER_TEST, completed_at)
    }

    /// Record a finished test of arbitrary length (rehydration, shortened tests).
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::EmptyTest` for `total == 0` and
    /// `AttemptError::ScoreOutOfRange` when `score > total`.
    pub fn with_total(
        test_number: TestNumber,
        score: u32,
        total: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        if total == 0 {
            return Err(AttemptError::EmptyTest);
        }
        if score > total {
            return Err(AttemptError::ScoreOutOfRange { score, total });
        }
        Ok(Self {
            test_number,
            score,
            total,
            completed_at,
        })
    }

    #[must_use]
    pub fn test_number(&self) -> TestNumber {
        self.test_number
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Score as a fraction of the test length in `0.0..=100.0`.
    #[must_use]
    pub fn percent(&self) -> f64 {
        f64::from(self.score) * 100.0 / f64::from(self.total)
    }

    #[must_use]
    pub fn outcome(&self, pass_mark_percent: u8) -> TestOutcome {
        TestOutcome::classify(self.score, self.total, pass_mark_percent)
    }
}

//
// ─── STATS ─────────────────────────────────────────────────────────────────────
//

/// Aggregate over every attempt of one test number.
#[derive(Debug, Clone, PartialEq)]
pub struct TestAttemptStats {
    pub test_number: TestNumber,
    pub best_score: u32,
    pub attempt_count: u32,
    pub average_score: f64,
}

impl TestAttemptStats {
    /// Aggregate the attempts for `test_number`; `None` when there are none.
    #[must_use]
    pub fn from_attempts<'a>(
        test_number: TestNumber,
        attempts: impl IntoIterator<Item = &'a TestAttempt>,
    ) -> Option<Self> {
        let mut best_score = 0_u32;
        let mut attempt_count = 0_u32;
        let mut sum = 0_u64;

        for attempt in attempts
            .into_iter()
            .filter(|a| a.test_number() == test_number)
        {
            best_score = best_score.max(attempt.score());
            attempt_count = attempt_count.saturating_add(1);
            sum += u64::from(attempt.score());
        }

        if attempt_count == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let average_score = sum as f64 / f64::from(attempt_count);

        Some(Self {
            test_number,
            best_score,
            attempt_count,
            average_score,
        })
    }
}

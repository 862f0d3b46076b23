use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;

use crate::model::ids::{Category, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("best streak ({best}) is below current streak ({current})")]
    StreakMismatch { current: u32, best: u32 },

    #[error("recent history holds {len} ids but the window is {window}")]
    WindowOverflow { len: usize, window: usize },

    #[error("per-category correct answers ({sum}) exceed the all-time total ({total})")]
    CategoryOverflow { sum: u64, total: u32 },
}

/// Per-user training counters.
///
/// Session counters (`correct`, `incorrect`, `current_streak`) are cleared by
/// [`TrainingProgress::reset_session`]. Lifetime values (`best_streak`,
/// `total_correct_all_time`, per-category counts) and the recent-history
/// window survive it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingProgress {
    correct: u32,
    incorrect: u32,
    current_streak: u32,
    best_streak: u32,
    recent: VecDeque<QuestionId>,
    total_correct_all_time: u32,
    category_correct: BTreeMap<Category, u32>,
}

impl TrainingProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate progress from persisted storage.
    ///
    /// `recent` is ordered oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` when the stored values break the streak,
    /// window or category invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        correct: u32,
        incorrect: u32,
        current_streak: u32,
        best_streak: u32,
        recent: Vec<QuestionId>,
        total_correct_all_time: u32,
        category_correct: BTreeMap<Category, u32>,
        window: usize,
    ) -> Result<Self, ProgressError> {
        if best_streak < current_streak {
            return Err(ProgressError::StreakMismatch {
                current: current_streak,
                best: best_streak,
            });
        }
        if recent.len() > window {
            return Err(ProgressError::WindowOverflow {
                len: recent.len(),
                window,
            });
        }
        let sum: u64 = category_correct.values().map(|v| u64::from(*v)).sum();
        if sum > u64::from(total_correct_all_time) {
            return Err(ProgressError::CategoryOverflow {
                sum,
                total: total_correct_all_time,
            });
        }

        Ok(Self {
            correct,
            incorrect,
            current_streak,
            best_streak,
            recent: recent.into(),
            total_correct_all_time,
            category_correct,
        })
    }

    /// Apply one answered training question.
    ///
    /// `window` bounds the recent-history list; the oldest ids are evicted first.
    pub fn record(&mut self, question_id: QuestionId, is_correct: bool, window: usize) {
        self.recent.push_back(question_id);
        while self.recent.len() > window {
            self.recent.pop_front();
        }

        if is_correct {
            self.correct = self.correct.saturating_add(1);
            self.current_streak = self.current_streak.saturating_add(1);
            self.best_streak = self.best_streak.max(self.current_streak);
            self.total_correct_all_time = self.total_correct_all_time.saturating_add(1);
        } else {
            self.incorrect = self.incorrect.saturating_add(1);
            self.current_streak = 0;
        }
    }

    /// Count a correct answer toward `category`.
    pub(crate) fn credit_category(&mut self, category: &Category) {
        let entry = self.category_correct.entry(category.clone()).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    /// Clear the session counters; keeps lifetime totals and recent history.
    pub fn reset_session(&mut self) {
        self.correct = 0;
        self.incorrect = 0;
        self.current_streak = 0;
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.correct.saturating_add(self.incorrect)
    }

    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub fn total_correct_all_time(&self) -> u32 {
        self.total_correct_all_time
    }

    /// Recently answered ids, oldest first.
    pub fn recent(&self) -> impl ExactSizeIterator<Item = &QuestionId> {
        self.recent.iter()
    }

    /// The last `n` answered ids, oldest first.
    #[must_use]
    pub fn recent_window(&self, n: usize) -> Vec<QuestionId> {
        let skip = self.recent.len().saturating_sub(n);
        self.recent.iter().skip(skip).cloned().collect()
    }

    #[must_use]
    pub fn category_correct(&self, category: &Category) -> u32 {
        self.category_correct.get(category).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn category_counts(&self) -> &BTreeMap<Category, u32> {
        &self.category_correct
    }

    /// Session accuracy in whole percent, 0 when nothing was answered.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        let answered = u64::from(self.answered());
        if answered == 0 {
            return 0;
        }
        let rounded = (u64::from(self.correct) * 100 + answered / 2) / answered;
        u32::try_from(rounded).unwrap_or(100)
    }
}

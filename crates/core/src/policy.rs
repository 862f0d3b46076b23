//! Tunable business rules for training and practice tests.
//!
//! Everything here is product configuration rather than algorithm: unlock
//! thresholds beyond test 1 and the pass-probability weighting are expected
//! to change without code changes, so they load from config files.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::TestNumber;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PolicyError {
    #[error("recent history window must be > 0")]
    InvalidRecentWindow,

    #[error("pass mark must be between 1 and 100 percent, got {0}")]
    InvalidPassMark(u8),

    #[error("category target must be > 0")]
    InvalidCategoryTarget,

    #[error("referral-gated test {0} is outside 1-4")]
    InvalidGatedTest(u8),

    #[error("recent attempts considered must be > 0")]
    InvalidRecentAttempts,

    #[error("recency decay must be in (0, 1], got {0}")]
    InvalidRecencyDecay(f64),

    #[error("best-score weight must be in [0, 1], got {0}")]
    InvalidBestScoreWeight(f64),
}

/// How the pass probability is derived from attempt history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassProbabilityPolicy {
    /// Only the newest N attempts contribute to the recent average.
    pub recent_attempts: usize,
    /// Weight multiplier per step back in history (newest weight is 1).
    pub recency_decay: f64,
    /// Share of the estimate taken from the best attempt ever.
    pub best_score_weight: f64,
}

impl Default for PassProbabilityPolicy {
    fn default() -> Self {
        Self {
            recent_attempts: 5,
            recency_decay: 0.6,
            best_score_weight: 0.25,
        }
    }
}

/// Rules the progress tracker applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressPolicy {
    /// Recent-history window excluded from training draws.
    pub recent_window: usize,
    /// All-time correct answers needed to unlock tests 1-4.
    pub unlock_thresholds: [u32; 4],
    /// Tests that also require the externally-earned referral unlock.
    pub referral_gated_tests: Vec<u8>,
    /// Minimum percentage counted as a pass.
    pub pass_mark_percent: u8,
    /// Correct answers per category considered "complete" on the dashboard.
    pub category_target: u32,
    pub pass_probability: PassProbabilityPolicy,
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            recent_window: 20,
            unlock_thresholds: [10; 4],
            referral_gated_tests: vec![4],
            pass_mark_percent: 70,
            category_target: 50,
            pass_probability: PassProbabilityPolicy::default(),
        }
    }
}

impl ProgressPolicy {
    /// Check that the configured values are usable.
    ///
    /// # Errors
    ///
    /// Returns the first `PolicyError` found.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.recent_window == 0 {
            return Err(PolicyError::InvalidRecentWindow);
        }
        if !(1..=100).contains(&self.pass_mark_percent) {
            return Err(PolicyError::InvalidPassMark(self.pass_mark_percent));
        }
        if self.category_target == 0 {
            return Err(PolicyError::InvalidCategoryTarget);
        }
        if let Some(bad) = self
            .referral_gated_tests
            .iter()
            .copied()
            .find(|n| TestNumber::new(*n).is_err())
        {
            return Err(PolicyError::InvalidGatedTest(bad));
        }

        let pp = &self.pass_probability;
        if pp.recent_attempts == 0 {
            return Err(PolicyError::InvalidRecentAttempts);
        }
        if !pp.recency_decay.is_finite() || pp.recency_decay <= 0.0 || pp.recency_decay > 1.0 {
            return Err(PolicyError::InvalidRecencyDecay(pp.recency_decay));
        }
        if !pp.best_score_weight.is_finite() || !(0.0..=1.0).contains(&pp.best_score_weight) {
            return Err(PolicyError::InvalidBestScoreWeight(pp.best_score_weight));
        }
        Ok(())
    }

    #[must_use]
    pub fn unlock_threshold(&self, test: TestNumber) -> u32 {
        self.unlock_thresholds[test.index()]
    }

    #[must_use]
    pub fn requires_referral(&self, test: TestNumber) -> bool {
        self.referral_gated_tests.contains(&test.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let policy = ProgressPolicy::default();
        policy.validate().unwrap();
        assert_eq!(policy.unlock_threshold(TestNumber::new(1).unwrap()), 10);
        assert!(policy.requires_referral(TestNumber::new(4).unwrap()));
        assert!(!policy.requires_referral(TestNumber::new(3).unwrap()));
    }

    #[test]
    fn rejects_bad_values() {
        let policy = ProgressPolicy {
            recent_window: 0,
            ..ProgressPolicy::default()
        };
        assert_eq!(policy.validate(), Err(PolicyError::InvalidRecentWindow));

        let policy = ProgressPolicy {
            referral_gated_tests: vec![5],
            ..ProgressPolicy::default()
        };
        assert_eq!(policy.validate(), Err(PolicyError::InvalidGatedTest(5)));

        let mut policy = ProgressPolicy::default();
        policy.pass_probability.recency_decay = 0.0;
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::InvalidRecencyDecay(_))
        ));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let policy: ProgressPolicy =
            serde_json::from_str(r#"{"unlock_thresholds":[10,25,50,50]}"#).unwrap();
        assert_eq!(policy.unlock_thresholds, [10, 25, 50, 50]);
        assert_eq!(policy.recent_window, 20);
        assert_eq!(policy.pass_probability, PassProbabilityPolicy::default());
    }
}

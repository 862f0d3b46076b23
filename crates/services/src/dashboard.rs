//! Presentation-agnostic dashboard built from a tracker.
//!
//! No pre-formatted strings; the presentation layer decides how to show
//! percentages, badges and locks.

use drill_core::model::{Category, TestNumber, TestOutcome};
use drill_core::{CategoryProgress, ProgressTracker};

/// Coarse reading of the pass probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutlook {
    /// No practice test taken yet.
    Unknown,
    Likely,
    Borderline,
    AtRisk,
}

impl PassOutlook {
    #[must_use]
    pub fn from_probability(probability: u8) -> Self {
        match probability {
            0 => Self::Unknown,
            80.. => Self::Likely,
            60..=79 => Self::Borderline,
            _ => Self::AtRisk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    NotStarted,
    Completed,
}

/// One practice test as the dashboard lists it.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCard {
    pub test_number: TestNumber,
    pub locked: bool,
    pub status: TestStatus,
    pub best_score: Option<u32>,
    pub attempt_count: u32,
    pub average_score: Option<f64>,
    /// Badge for the most recent attempt.
    pub latest_outcome: Option<TestOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub pass_probability: u8,
    pub outlook: PassOutlook,
    pub onboarding_complete: bool,
    pub tests: Vec<TestCard>,
    pub categories: Vec<CategoryProgress>,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_correct_all_time: u32,
    /// Session accuracy, rounded percent.
    pub accuracy_percent: u32,
}

impl DashboardView {
    #[must_use]
    pub fn build(
        tracker: &ProgressTracker,
        categories: &[Category],
        referral_unlocked: bool,
    ) -> Self {
        let pass_mark = tracker.policy().pass_mark_percent;
        let onboarding_complete = tracker.is_onboarding_complete();
        let tests = TestNumber::all()
            .map(|test| {
                let stats = tracker.test_attempt_stats(test);
                TestCard {
                    test_number: test,
                    locked: !onboarding_complete
                        || !tracker.is_test_unlocked(test, referral_unlocked),
                    status: if stats.is_some() {
                        TestStatus::Completed
                    } else {
                        TestStatus::NotStarted
                    },
                    best_score: stats.as_ref().map(|s| s.best_score),
                    attempt_count: stats.as_ref().map_or(0, |s| s.attempt_count),
                    average_score: stats.as_ref().map(|s| s.average_score),
                    latest_outcome: tracker.latest_attempt(test).map(|a| a.outcome(pass_mark)),
                }
            })
            .collect();

        let training = tracker.training();
        let pass_probability = tracker.pass_probability();
        Self {
            pass_probability,
            outlook: PassOutlook::from_probability(pass_probability),
            onboarding_complete,
            tests,
            categories: tracker.category_progress(categories),
            current_streak: training.current_streak(),
            best_streak: training.best_streak(),
            total_correct_all_time: training.total_correct_all_time(),
            accuracy_percent: training.accuracy_percent(),
        }
    }
}

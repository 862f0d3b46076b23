#![forbid(unsafe_code)]

pub mod dashboard;
pub mod error;
pub mod progress_service;
pub mod training;

#[cfg(test)]
mod test_support;

pub use drill_core::Clock;

pub use dashboard::{DashboardView, PassOutlook, TestCard, TestStatus};
pub use error::{ProgressServiceError, TrainingError};
pub use progress_service::ProgressService;
pub use training::{
    AnswerFeedback, TrainingLoopService, TrainingPhase, TrainingSession, pick_training_question,
};

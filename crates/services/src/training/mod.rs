//! Training mode: endless single-question drill over one state's question set.

pub mod selector;
pub mod service;
pub mod session;

pub use selector::pick_training_question;
pub use service::TrainingLoopService;
pub use session::{AnswerFeedback, TrainingPhase, TrainingSession};

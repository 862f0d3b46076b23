mod attempt;
mod bank;
mod ids;
mod progress;
mod question;
mod record;

pub use attempt::{AttemptError, QUESTIONS_PER_TEST, TestAttempt, TestAttemptStats, TestOutcome};
pub use bank::{BankError, QuestionBank};
pub use ids::{Category, IdError, QuestionId, StateCode, TestNumber, UserId};
pub use progress::{ProgressError, TrainingProgress};
pub use question::{OPTION_COUNT, OptionIndex, Question, QuestionError};
pub use record::{CorrectAnswerField, QuestionRecord};

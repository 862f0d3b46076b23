#![forbid(unsafe_code)]

pub mod questions;
pub mod repository;
pub mod sqlite;

pub use questions::{InMemoryQuestionSource, JsonQuestionSource, QuestionSource, load_bank};
pub use repository::{InMemoryRepository, ProgressRecord, ProgressRepository, Storage, StorageError};

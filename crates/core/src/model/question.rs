use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{Category, IdError, QuestionId, StateCode};

/// Every question offers exactly this many answer options (A–D).
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a question (or a raw source record) cannot be accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("record has no identifier")]
    MissingId,

    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("record has no answer options")]
    MissingOptions,

    #[error("record mixes an options array with discrete option fields")]
    ConflictingOptions,

    #[error("expected {expected} answer options, found {found}")]
    OptionCount { expected: usize, found: usize },

    #[error("answer option {letter} is empty")]
    EmptyOption { letter: char },

    #[error("record has no correct answer")]
    MissingCorrectAnswer,

    #[error("correct answer index {0} is outside 0-3")]
    IndexOutOfRange(i64),

    #[error("correct answer code {0:?} is not one of A, B, C, D")]
    UnknownLetter(String),

    #[error(transparent)]
    Id(#[from] IdError),
}

//
// ─── OPTION INDEX ──────────────────────────────────────────────────────────────
//

/// Canonical position of an answer option, 0–3 (displayed as A–D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OptionIndex(u8);

impl OptionIndex {
    /// All positions in display order.
    pub const ALL: [OptionIndex; OPTION_COUNT] =
        [OptionIndex(0), OptionIndex(1), OptionIndex(2), OptionIndex(3)];

    /// Converts a numeric index to an `OptionIndex`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::IndexOutOfRange` outside `0..=3`.
    pub fn from_index(value: i64) -> Result<Self, QuestionError> {
        match value {
            0..=3 => Ok(Self(u8::try_from(value).unwrap_or_default())),
            _ => Err(QuestionError::IndexOutOfRange(value)),
        }
    }

    /// Converts a one-letter code (case-insensitive) to an `OptionIndex`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownLetter` for anything but a single `A`–`D`.
    pub fn from_letter(code: &str) -> Result<Self, QuestionError> {
        let mut chars = code.trim().chars();
        match (chars.next().map(|c| c.to_ascii_uppercase()), chars.next()) {
            (Some('A'), None) => Ok(Self(0)),
            (Some('B'), None) => Ok(Self(1)),
            (Some('C'), None) => Ok(Self(2)),
            (Some('D'), None) => Ok(Self(3)),
            _ => Err(QuestionError::UnknownLetter(code.to_owned())),
        }
    }

    #[must_use]
    pub fn value(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn letter(self) -> char {
        char::from(b'A' + self.0)
    }
}

impl TryFrom<u8> for OptionIndex {
    type Error = QuestionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(i64::from(value))
    }
}

impl From<OptionIndex> for u8 {
    fn from(value: OptionIndex) -> Self {
        value.0
    }
}

impl FromStr for OptionIndex {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_letter(s)
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A fixed multiple-choice practice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    state: StateCode,
    category: Category,
    prompt: String,
    options: [String; OPTION_COUNT],
    correct: OptionIndex,
}

impl Question {
    /// Build a question, trimming text fields.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` or `QuestionError::EmptyOption` for blank text.
    pub fn new(
        id: QuestionId,
        state: StateCode,
        category: Category,
        prompt: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct: OptionIndex,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let mut cleaned: [String; OPTION_COUNT] = Default::default();
        for (slot, (index, option)) in cleaned
            .iter_mut()
            .zip(OptionIndex::ALL.into_iter().zip(options))
        {
            let text = option.trim();
            if text.is_empty() {
                return Err(QuestionError::EmptyOption {
                    letter: index.letter(),
                });
            }
            *slot = text.to_owned();
        }

        Ok(Self {
            id,
            state,
            category,
            prompt,
            options: cleaned,
            correct,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn state(&self) -> &StateCode {
        &self.state
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: OptionIndex) -> &str {
        &self.options[index.value()]
    }

    #[must_use]
    pub fn correct(&self) -> OptionIndex {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, choice: OptionIndex) -> bool {
        self.correct == choice
    }
}

use serde::{Deserialize, Serialize};

use crate::model::ids::{Category, QuestionId, StateCode};
use crate::model::question::{OPTION_COUNT, OptionIndex, Question, QuestionError};

/// Correct answer as it appears in source data: a numeric index or a letter code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswerField {
    Index(i64),
    Code(String),
}

impl CorrectAnswerField {
    fn resolve(&self) -> Result<OptionIndex, QuestionError> {
        match self {
            CorrectAnswerField::Index(value) => OptionIndex::from_index(*value),
            CorrectAnswerField::Code(code) => OptionIndex::from_letter(code),
        }
    }
}

/// Raw question record exactly as supplied by the question data source.
///
/// Two shapes are accepted for the options (an `options` array or four
/// `option_a`..`option_d` fields) and two for the correct answer (index or
/// letter). [`QuestionRecord::into_question`] normalizes both into a
/// [`Question`] and rejects records that mix shapes or are incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(default, alias = "questionId", alias = "question_id")]
    pub id: Option<String>,

    #[serde(default, alias = "question", alias = "text")]
    pub prompt: Option<String>,

    #[serde(default, alias = "answers", skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(default, alias = "optionA", alias = "a", skip_serializing_if = "Option::is_none")]
    pub option_a: Option<String>,
    #[serde(default, alias = "optionB", alias = "b", skip_serializing_if = "Option::is_none")]
    pub option_b: Option<String>,
    #[serde(default, alias = "optionC", alias = "c", skip_serializing_if = "Option::is_none")]
    pub option_c: Option<String>,
    #[serde(default, alias = "optionD", alias = "d", skip_serializing_if = "Option::is_none")]
    pub option_d: Option<String>,

    #[serde(default, alias = "correctAnswer", alias = "correct_answer", alias = "answer")]
    pub correct: Option<CorrectAnswerField>,

    #[serde(default, alias = "topic", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl QuestionRecord {
    /// Identifier as written in the source, for error reporting.
    #[must_use]
    pub fn raw_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Normalize the record into a canonical [`Question`] owned by `state`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the record is incomplete, mixes encodings,
    /// or the correct answer cannot be resolved to exactly one of A–D.
    pub fn into_question(self, state: &StateCode) -> Result<Question, QuestionError> {
        let id = self.id.as_deref().ok_or(QuestionError::MissingId)?;
        let id = QuestionId::new(id)?;
        let prompt = self.prompt.clone().unwrap_or_default();
        let options = self.normalized_options()?;
        let correct = self
            .correct
            .as_ref()
            .ok_or(QuestionError::MissingCorrectAnswer)?
            .resolve()?;
        let category = match self.category.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Category::new(raw)?,
            _ => Category::general(),
        };

        Question::new(id, state.clone(), category, prompt, options, correct)
    }

    fn normalized_options(&self) -> Result<[String; OPTION_COUNT], QuestionError> {
        let discrete = [&self.option_a, &self.option_b, &self.option_c, &self.option_d];
        let discrete_found = discrete.iter().filter(|o| o.is_some()).count();

        match (&self.options, discrete_found) {
            (Some(_), n) if n > 0 => Err(QuestionError::ConflictingOptions),
            (Some(list), _) => <[String; OPTION_COUNT]>::try_from(list.clone()).map_err(|list| {
                QuestionError::OptionCount {
                    expected: OPTION_COUNT,
                    found: list.len(),
                }
            }),
            (None, 0) => Err(QuestionError::MissingOptions),
            (None, OPTION_COUNT) => Ok(discrete.map(|o| o.clone().unwrap_or_default())),
            (None, found) => Err(QuestionError::OptionCount {
                expected: OPTION_COUNT,
                found,
            }),
        }
    }
}

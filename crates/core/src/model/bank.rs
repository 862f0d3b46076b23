use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

use crate::model::ids::{Category, QuestionId, StateCode};
use crate::model::question::{Question, QuestionError};
use crate::model::record::QuestionRecord;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("no question set loaded for state {0}")]
    UnknownState(StateCode),

    #[error("state {state}: record #{index} ({id}) is malformed: {source}")]
    InvalidRecord {
        state: StateCode,
        index: usize,
        id: String,
        #[source]
        source: QuestionError,
    },

    #[error("state {state}: duplicate question id {id} in category {category}")]
    DuplicateQuestion {
        state: StateCode,
        category: Category,
        id: QuestionId,
    },
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Immutable per-state question sets, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    states: BTreeMap<StateCode, Vec<Question>>,
}

impl QuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bank holding a single state's records.
    ///
    /// # Errors
    ///
    /// See [`QuestionBank::insert_records`].
    pub fn from_records(
        state: StateCode,
        records: impl IntoIterator<Item = QuestionRecord>,
    ) -> Result<Self, BankError> {
        let mut bank = Self::new();
        bank.insert_records(state, records)?;
        Ok(bank)
    }

    /// Normalize and add a state's raw records, replacing any previous set for it.
    ///
    /// The whole state is rejected on the first malformed record; nothing is
    /// partially inserted.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InvalidRecord` for a record that fails normalization,
    /// or `BankError::DuplicateQuestion` when an id repeats within a category.
    pub fn insert_records(
        &mut self,
        state: StateCode,
        records: impl IntoIterator<Item = QuestionRecord>,
    ) -> Result<usize, BankError> {
        let mut questions = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            let id = record.raw_id().unwrap_or("<missing id>").to_owned();
            let question =
                record
                    .into_question(&state)
                    .map_err(|source| BankError::InvalidRecord {
                        state: state.clone(),
                        index,
                        id,
                        source,
                    })?;
            questions.push(question);
        }
        self.insert_questions(state, questions)
    }

    /// Add already-built questions for a state, replacing any previous set for it.
    ///
    /// # Errors
    ///
    /// Returns `BankError::DuplicateQuestion` when an id repeats within a category.
    pub fn insert_questions(
        &mut self,
        state: StateCode,
        questions: Vec<Question>,
    ) -> Result<usize, BankError> {
        {
            let mut seen: HashSet<(&Category, &QuestionId)> = HashSet::new();
            for q in &questions {
                if !seen.insert((q.category(), q.id())) {
                    return Err(BankError::DuplicateQuestion {
                        state,
                        category: q.category().clone(),
                        id: q.id().clone(),
                    });
                }
            }
        }
        let count = questions.len();
        self.states.insert(state, questions);
        Ok(count)
    }

    /// Loaded state codes in ascending order.
    pub fn states(&self) -> impl Iterator<Item = &StateCode> {
        self.states.keys()
    }

    #[must_use]
    pub fn contains_state(&self, state: &StateCode) -> bool {
        self.states.contains_key(state)
    }

    /// Every question loaded for `state`, in source order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::UnknownState` if the state was never loaded.
    pub fn questions(&self, state: &StateCode) -> Result<&[Question], BankError> {
        self.states
            .get(state)
            .map(Vec::as_slice)
            .ok_or_else(|| BankError::UnknownState(state.clone()))
    }

    /// Number of questions loaded for `state` (0 for unknown states).
    #[must_use]
    pub fn len(&self, state: &StateCode) -> usize {
        self.states.get(state).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.values().all(Vec::is_empty)
    }

    /// Look up a question by id within a state.
    #[must_use]
    pub fn get(&self, state: &StateCode, id: &QuestionId) -> Option<&Question> {
        self.states.get(state)?.iter().find(|q| q.id() == id)
    }

    /// Distinct categories present for `state`, sorted.
    ///
    /// # Errors
    ///
    /// Returns `BankError::UnknownState` if the state was never loaded.
    pub fn categories(&self, state: &StateCode) -> Result<Vec<Category>, BankError> {
        let set: BTreeSet<&Category> = self.questions(state)?.iter().map(Question::category).collect();
        Ok(set.into_iter().cloned().collect())
    }

    /// Questions eligible for the next training draw.
    ///
    /// Questions whose id appears in `exclude` are skipped. When that leaves
    /// nothing, the full per-state set is returned so training can always
    /// continue. An empty result means the state has no questions at all.
    ///
    /// # Errors
    ///
    /// Returns `BankError::UnknownState` if the state was never loaded.
    pub fn candidates<'a>(
        &'a self,
        state: &StateCode,
        exclude: &[QuestionId],
    ) -> Result<Vec<&'a Question>, BankError> {
        let all = self.questions(state)?;
        let excluded: HashSet<&QuestionId> = exclude.iter().collect();
        let fresh: Vec<&Question> = all.iter().filter(|q| !excluded.contains(q.id())).collect();
        if fresh.is_empty() {
            return Ok(all.iter().collect());
        }
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::CorrectAnswerField;

    fn record(id: &str, category: Option<&str>) -> QuestionRecord {
        QuestionRecord {
            id: Some(id.into()),
            prompt: Some(format!("Prompt {id}")),
            options: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            correct: Some(CorrectAnswerField::Index(1)),
            category: category.map(str::to_owned),
            ..QuestionRecord::default()
        }
    }

    fn zz() -> StateCode {
        StateCode::new("ZZ").unwrap()
    }

    fn ids(ids: &[&str]) -> Vec<QuestionId> {
        ids.iter().map(|i| QuestionId::new(i).unwrap()).collect()
    }

    fn five_question_bank() -> QuestionBank {
        QuestionBank::from_records(zz(), (1..=5).map(|i| record(&format!("Q{i}"), None))).unwrap()
    }

    #[test]
    fn unknown_state_is_not_found() {
        let bank = five_question_bank();
        let other = StateCode::new("CA").unwrap();
        assert_eq!(
            bank.candidates(&other, &[]).unwrap_err(),
            BankError::UnknownState(other)
        );
    }

    #[test]
    fn single_remaining_candidate_is_returned() {
        let bank = five_question_bank();
        let found = bank
            .candidates(&zz(), &ids(&["Q1", "Q2", "Q3", "Q4"]))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id().as_str(), "Q5");
    }

    #[test]
    fn fully_excluded_falls_back_to_whole_state() {
        let bank = five_question_bank();
        let found = bank
            .candidates(&zz(), &ids(&["Q1", "Q2", "Q3", "Q4", "Q5"]))
            .unwrap();
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn empty_state_yields_no_candidates() {
        let bank = QuestionBank::from_records(zz(), Vec::new()).unwrap();
        assert!(bank.candidates(&zz(), &[]).unwrap().is_empty());
        assert!(bank.is_empty());
    }

    #[test]
    fn malformed_record_reports_position_and_id() {
        let mut bad = record("Q2", None);
        bad.correct = Some(CorrectAnswerField::Code("Z".into()));
        let err = QuestionBank::from_records(zz(), vec![record("Q1", None), bad]).unwrap_err();
        match err {
            BankError::InvalidRecord { index, id, source, .. } => {
                assert_eq!(index, 1);
                assert_eq!(id, "Q2");
                assert!(matches!(source, QuestionError::UnknownLetter(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_rejected_only_within_category() {
        let dup = QuestionBank::from_records(zz(), vec![record("Q1", Some("signs")), record("Q1", Some("signs"))]);
        assert!(matches!(dup, Err(BankError::DuplicateQuestion { .. })));

        let split = QuestionBank::from_records(zz(), vec![record("Q1", Some("signs")), record("Q1", Some("rules"))])
            .unwrap();
        assert_eq!(split.len(&zz()), 2);
        assert_eq!(
            split.categories(&zz()).unwrap(),
            vec![Category::new("rules").unwrap(), Category::new("signs").unwrap()]
        );
    }

    #[test]
    fn lookup_by_id() {
        let bank = five_question_bank();
        let id = QuestionId::new("Q3").unwrap();
        assert_eq!(bank.get(&zz(), &id).unwrap().prompt(), "Prompt Q3");
        assert!(bank.get(&zz(), &QuestionId::new("nope").unwrap()).is_none());
        assert_eq!(bank.states().count(), 1);
    }
}

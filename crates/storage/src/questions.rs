//! Question data sources.
//!
//! Questions ship as static JSON: one file per state named `<STATE>.json`,
//! each holding an array of raw records. Records are normalized into the
//! domain `QuestionBank` at load time and the bank is read-only afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use drill_core::model::{QuestionBank, QuestionRecord, StateCode};

use crate::repository::StorageError;

/// Supplies raw question records per state.
pub trait QuestionSource {
    /// States this source can provide, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source cannot be listed.
    fn states(&self) -> Result<Vec<StateCode>, StorageError>;

    /// Raw records for one state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown state, or a read/parse error.
    fn records(&self, state: &StateCode) -> Result<Vec<QuestionRecord>, StorageError>;
}

/// Normalize every state the source offers into a bank.
///
/// # Errors
///
/// Fails on the first unreadable file or malformed record.
pub fn load_bank(source: &dyn QuestionSource) -> Result<QuestionBank, StorageError> {
    let mut bank = QuestionBank::new();
    for state in source.states()? {
        let records = source.records(&state)?;
        let count = bank.insert_records(state.clone(), records)?;
        tracing::debug!(state = %state, count, "loaded question set");
    }
    tracing::info!(states = bank.states().count(), "question bank ready");
    Ok(bank)
}

/// Reads `<STATE>.json` files from a directory.
#[derive(Debug, Clone)]
pub struct JsonQuestionSource {
    dir: PathBuf,
}

impl JsonQuestionSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `ZZ.json`, falling back to `zz.json`.
    fn path_for(&self, state: &StateCode) -> PathBuf {
        let upper = self.dir.join(format!("{state}.json"));
        if upper.exists() {
            return upper;
        }
        let lower = self
            .dir
            .join(format!("{}.json", state.as_str().to_ascii_lowercase()));
        if lower.exists() { lower } else { upper }
    }
}

impl QuestionSource for JsonQuestionSource {
    fn states(&self) -> Result<Vec<StateCode>, StorageError> {
        let mut states = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match StateCode::new(stem) {
                Ok(code) => states.push(code),
                Err(e) => tracing::warn!(path = %path.display(), "skipping question file: {e}"),
            }
        }
        states.sort();
        states.dedup();
        Ok(states)
    }

    fn records(&self, state: &StateCode) -> Result<Vec<QuestionRecord>, StorageError> {
        let path = self.path_for(state);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))
    }
}

/// Fixed records held in memory; handy for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionSource {
    sets: BTreeMap<StateCode, Vec<QuestionRecord>>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_state(mut self, state: StateCode, records: Vec<QuestionRecord>) -> Self {
        self.sets.insert(state, records);
        self
    }
}

impl QuestionSource for InMemoryQuestionSource {
    fn states(&self) -> Result<Vec<StateCode>, StorageError> {
        Ok(self.sets.keys().cloned().collect())
    }

    fn records(&self, state: &StateCode) -> Result<Vec<QuestionRecord>, StorageError> {
        self.sets.get(state).cloned().ok_or(StorageError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::{BankError, CorrectAnswerField};

    fn record(id: &str) -> QuestionRecord {
        QuestionRecord {
            id: Some(id.into()),
            prompt: Some("P".into()),
            options: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            correct: Some(CorrectAnswerField::Code("B".into())),
            ..QuestionRecord::default()
        }
    }

    #[test]
    fn loads_every_state_from_memory() {
        let source = InMemoryQuestionSource::new()
            .with_state(StateCode::new("ZZ").unwrap(), vec![record("q1"), record("q2")])
            .with_state(StateCode::new("YY").unwrap(), vec![record("q1")]);

        let bank = load_bank(&source).unwrap();
        assert_eq!(bank.len(&StateCode::new("ZZ").unwrap()), 2);
        assert_eq!(bank.len(&StateCode::new("YY").unwrap()), 1);
    }

    #[test]
    fn malformed_record_fails_the_load() {
        let mut bad = record("q2");
        bad.options = None;
        let source = InMemoryQuestionSource::new()
            .with_state(StateCode::new("ZZ").unwrap(), vec![record("q1"), bad]);

        assert!(matches!(
            load_bank(&source),
            Err(StorageError::Bank(BankError::InvalidRecord { index: 1, .. }))
        ));
    }
}

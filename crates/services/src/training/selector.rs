use rand::Rng;
use rand::seq::IndexedRandom;

use drill_core::model::{BankError, Question, QuestionBank, QuestionId, StateCode};

/// Draw the next training question uniformly from the bank's candidates.
///
/// Recently answered ids in `exclude` are skipped unless that would leave
/// nothing to ask. `Ok(None)` means the state has no questions at all.
///
/// # Errors
///
/// Returns `BankError::UnknownState` if the state was never loaded.
pub fn pick_training_question<'a, R: Rng + ?Sized>(
    bank: &'a QuestionBank,
    state: &StateCode,
    exclude: &[QuestionId],
    rng: &mut R,
) -> Result<Option<&'a Question>, BankError> {
    let candidates = bank.candidates(state, exclude)?;
    let picked = candidates.choose(rng).copied();
    match picked {
        Some(q) => tracing::debug!(
            state = %state,
            question = %q.id(),
            candidates = candidates.len(),
            "picked training question"
        ),
        None => tracing::warn!(state = %state, "no training questions available"),
    }
    Ok(picked)
}

use crate::error::QuizError;
use crate::models::question::OPTION_COUNT;
use crate::models::{AnswerOutcome, OptionLetter, Question};

/// Compares the chosen option against the question's answer key.
///
/// An index outside `0..4` is rejected with `InvalidInput`; sessions check
/// the range before calling this, so the rejection only reaches callers
/// that evaluate questions directly.
pub fn evaluate(question: &Question, option_index: usize) -> Result<AnswerOutcome, QuizError> {
    let chosen = OptionLetter::from_index(option_index).ok_or(QuizError::InvalidInput {
        option_index,
        option_count: OPTION_COUNT,
    })?;

    if chosen == question.correct {
        Ok(AnswerOutcome::Correct)
    } else {
        Ok(AnswerOutcome::Incorrect)
    }
}

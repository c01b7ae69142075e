//! Error types for quiz sessions and question providers.

use thiserror::Error;

/// Rejections produced by a quiz session.
///
/// `NoQuestionsAvailable` is fatal to construction. The other two are local
/// to the event that caused them and leave the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The question set for the session is empty.
    #[error("No questions available for this session")]
    NoQuestionsAvailable,

    /// The chosen option does not exist on the question card.
    #[error("Invalid option index {option_index}: expected 0..{option_count}")]
    InvalidInput {
        /// The rejected index
        option_index: usize,
        /// Number of options on the card
        option_count: usize,
    },

    /// The event cannot be handled in the session's current state.
    #[error("Cannot handle {event} while session is {state}")]
    InvalidState {
        /// Name of the state the session was in
        state: &'static str,
        /// Name of the rejected event
        event: &'static str,
    },
}

/// Errors raised while loading questions from a bank.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The bank could not be read.
    #[error("Failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    /// The bank is not valid JSON for a list of questions.
    #[error("Failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record parsed but failed validation.
    #[error("Invalid question '{id}': {reason}")]
    InvalidRecord {
        /// Identifier of the offending record
        id: String,
        /// Validation failure details
        reason: String,
    },
}

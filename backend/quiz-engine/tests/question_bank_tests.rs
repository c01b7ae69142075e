use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_engine::error::ProviderError;
use quiz_engine::models::{Category, Difficulty, Level, OptionLetter};
use quiz_engine::services::question_provider::{
    InMemoryQuestionProvider, JsonQuestionProvider, QuestionProvider,
};
use quiz_engine::{AppState, Config, QuizError, SessionState};
use tempfile::NamedTempFile;
use tokio_test::{assert_err, assert_ok};

mod common;

use common::{carryover, questions, CORRECT};

fn bank_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const TWO_RECORDS: &str = r#"[
  {
    "id": "art-h-1",
    "prompt": "Who painted Abaporu?",
    "options": ["Tarsila do Amaral", "Anita Malfatti", "Candido Portinari", "Di Cavalcanti"],
    "category": "art",
    "difficulty": "hard",
    "answer": "A"
  },
  {
    "id": "art-h-2",
    "prompt": "Which city hosts the Inhotim museum park?",
    "options": ["Recife", "Brumadinho", "Curitiba", "Belem"],
    "category": "art",
    "difficulty": "hard",
    "answer": "B"
  }
]"#;

#[tokio::test]
async fn test_json_bank_loads_and_filters() {
    let file = bank_file(TWO_RECORDS);

    let provider = assert_ok!(JsonQuestionProvider::from_path(file.path(), 10).await);

    let mut selected = assert_ok!(provider.fetch_questions(Difficulty::Hard, Category::Art).await);
    selected.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].correct, OptionLetter::A);
    assert_eq!(selected[1].option(OptionLetter::B), "Brumadinho");

    let other = assert_ok!(provider.fetch_questions(Difficulty::Easy, Category::Art).await);
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_missing_bank_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = assert_err!(JsonQuestionProvider::from_path(dir.path().join("none.json"), 10).await);
    assert!(matches!(err, ProviderError::Io(_)));
}

#[test]
fn test_malformed_bank_is_parse_error() {
    let err = assert_err!(JsonQuestionProvider::from_json("[{\"id\": 1}]", 10));
    assert!(matches!(err, ProviderError::Parse(_)));
}

#[test]
fn test_record_with_blank_option_is_rejected() {
    let raw = TWO_RECORDS.replace("\"Belem\"", "\"  \"");

    let err = assert_err!(JsonQuestionProvider::from_json(&raw, 10));

    match err {
        ProviderError::InvalidRecord { id, .. } => assert_eq!(id, "art-h-2"),
        other => panic!("expected InvalidRecord, got {:?}", other),
    }
}

#[test]
fn test_record_with_unknown_answer_is_rejected() {
    let raw = TWO_RECORDS.replace("\"answer\": \"B\"", "\"answer\": \"E\"");
    assert!(JsonQuestionProvider::from_json(&raw, 10).is_err());
}

#[tokio::test]
async fn test_shipped_bank_covers_default_level() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/questions.json");
    let config = Config::default();
    let level = assert_ok!(config.game.level());

    let provider = assert_ok!(JsonQuestionProvider::from_path(&path, 10).await);
    let selected = assert_ok!(
        provider
            .fetch_questions(level.difficulty, level.category)
            .await
    );

    assert!(!selected.is_empty());
    assert!(selected.len() <= config.game.questions_per_session);
}

#[tokio::test]
async fn test_app_state_starts_session_with_carryover() {
    common::init_tracing();
    let provider = InMemoryQuestionProvider::new(questions(4), 10);
    let state = AppState::new(Config::default(), Arc::new(provider));
    let level = Level::new(Difficulty::Expert, Category::Culture);

    let mut session = assert_ok!(state.start_session(level, Some(carryover(2, 1, true))).await);

    assert_eq!(session.level(), Some(level));
    assert_eq!(session.question_count(), 4);
    assert_eq!(session.lives(), 2);
    assert!(session.second_chance_available());
    assert_eq!(session.remaining_seconds(), 30);

    let first = session.current_question().unwrap().id.clone();
    assert_ok!(session.answer(CORRECT));
    assert_eq!(session.consecutive_correct(), 2);
    assert_ne!(session.current_question().unwrap().id, first);
    assert_eq!(session.state(), SessionState::AwaitingAnswer);
}

#[tokio::test]
async fn test_app_state_reports_empty_level() {
    let provider = InMemoryQuestionProvider::new(questions(4), 10);
    let state = AppState::new(Config::default(), Arc::new(provider));

    let err = assert_err!(
        state
            .start_session(Level::new(Difficulty::Easy, Category::Food), None)
            .await
    );

    assert_eq!(
        err.downcast_ref::<QuizError>(),
        Some(&QuizError::NoQuestionsAvailable)
    );
}

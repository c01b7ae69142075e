use crate::config::Config;
use crate::models::{Carryover, Level};
use anyhow::Context;
use std::sync::Arc;

use self::question_provider::{load_question_set, JsonQuestionProvider, QuestionProvider};
use self::quiz_session::QuizSession;

pub mod answer_evaluator;
pub mod bonus_policy;
pub mod question_provider;
pub mod quiz_session;
pub mod session_driver;
pub mod time_budget;

pub struct AppState {
    pub config: Config,
    pub questions: Arc<dyn QuestionProvider>,
}

impl AppState {
    pub fn new(config: Config, questions: Arc<dyn QuestionProvider>) -> Self {
        Self { config, questions }
    }

    /// Builds state around the JSON question bank named in the config.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let provider = JsonQuestionProvider::from_path(
            &config.question_bank.path,
            config.game.questions_per_session,
        )
        .await
        .with_context(|| {
            format!(
                "Failed to load question bank from {}",
                config.question_bank.path
            )
        })?;

        Ok(Self::new(config, Arc::new(provider)))
    }

    /// Fetches questions for `level` and starts a session on them.
    pub async fn start_session(
        &self,
        level: Level,
        carryover: Option<Carryover>,
    ) -> anyhow::Result<QuizSession> {
        let questions = load_question_set(self.questions.as_ref(), level).await?;

        let mut builder = QuizSession::builder(questions)
            .timing(self.config.timing.clone())
            .game(self.config.game.clone())
            .level(level);
        if let Some(carryover) = carryover {
            builder = builder.carryover(carryover);
        }

        Ok(builder.start()?)
    }
}

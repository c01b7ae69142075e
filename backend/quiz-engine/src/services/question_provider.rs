use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::path::Path;
use validator::Validate;

use crate::error::{ProviderError, QuizError};
use crate::models::{Category, Difficulty, Level, Question, QuestionRecord, QuestionSet};

/// Supplies the questions for one play-through.
///
/// Implementations decide order and size; the session plays whatever comes
/// back, in that order.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    async fn fetch_questions(
        &self,
        difficulty: Difficulty,
        category: Category,
    ) -> Result<Vec<Question>, ProviderError>;
}

/// Fetches the question set for `level`, failing with
/// `NoQuestionsAvailable` when the provider has nothing for it.
pub async fn load_question_set(
    provider: &dyn QuestionProvider,
    level: Level,
) -> anyhow::Result<QuestionSet> {
    let questions = provider
        .fetch_questions(level.difficulty, level.category)
        .await?;

    if questions.is_empty() {
        tracing::warn!("No questions found for level {}", level);
        return Err(QuizError::NoQuestionsAvailable.into());
    }

    tracing::info!("Loaded {} questions for level {}", questions.len(), level);
    Ok(QuestionSet::new(questions))
}

/// Holds a bank in memory; every fetch filters, shuffles and truncates.
#[derive(Debug, Clone)]
pub struct InMemoryQuestionProvider {
    questions: Vec<Question>,
    limit: usize,
}

impl InMemoryQuestionProvider {
    pub fn new(questions: Vec<Question>, limit: usize) -> Self {
        Self { questions, limit }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[async_trait]
impl QuestionProvider for InMemoryQuestionProvider {
    async fn fetch_questions(
        &self,
        difficulty: Difficulty,
        category: Category,
    ) -> Result<Vec<Question>, ProviderError> {
        let mut selected: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| q.difficulty == difficulty && q.category == category)
            .cloned()
            .collect();

        selected.shuffle(&mut rand::rng());
        selected.truncate(self.limit);

        tracing::debug!(
            "Selected {} of {} questions for difficulty={}, category={}",
            selected.len(),
            self.questions.len(),
            difficulty,
            category
        );
        Ok(selected)
    }
}

/// Question bank stored as a JSON array of records.
#[derive(Debug, Clone)]
pub struct JsonQuestionProvider {
    inner: InMemoryQuestionProvider,
}

impl JsonQuestionProvider {
    pub async fn from_path(path: impl AsRef<Path>, limit: usize) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let provider = Self::from_json(&raw, limit)?;
        tracing::info!(
            "Question bank loaded from {}: {} questions",
            path.display(),
            provider.inner.len()
        );
        Ok(provider)
    }

    pub fn from_json(raw: &str, limit: usize) -> Result<Self, ProviderError> {
        let records: Vec<QuestionRecord> = serde_json::from_str(raw)?;

        let mut questions = Vec::with_capacity(records.len());
        for record in records {
            record
                .validate()
                .map_err(|e| ProviderError::InvalidRecord {
                    id: record.id.clone(),
                    reason: e.to_string(),
                })?;
            questions.push(Question::from(record));
        }

        Ok(Self {
            inner: InMemoryQuestionProvider::new(questions, limit),
        })
    }
}

#[async_trait]
impl QuestionProvider for JsonQuestionProvider {
    async fn fetch_questions(
        &self,
        difficulty: Difficulty,
        category: Category,
    ) -> Result<Vec<Question>, ProviderError> {
        self.inner.fetch_questions(difficulty, category).await
    }
}

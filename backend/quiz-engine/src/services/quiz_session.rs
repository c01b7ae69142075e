use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::answer_evaluator;
use super::bonus_policy::{BonusPolicy, RandomSource, ThreadRandom};
use super::time_budget::TimeBudget;
use crate::config::{GameConfig, TimingConfig};
use crate::error::QuizError;
use crate::metrics;
use crate::models::question::OPTION_COUNT;
use crate::models::{
    AnswerOutcome, BonusKind, Carryover, Level, Question, QuestionSet, Resolution, SessionEvent,
    SessionSummary, SummaryStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingAnswer,
    /// Only observable from inside an event handler.
    Resolving,
    Completed,
    GameOver,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::AwaitingAnswer => "awaiting_answer",
            SessionState::Resolving => "resolving",
            SessionState::Completed => "completed",
            SessionState::GameOver => "game_over",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::GameOver)
    }
}

/// Configures and starts a [`QuizSession`].
pub struct SessionBuilder {
    questions: QuestionSet,
    timing: TimingConfig,
    game: GameConfig,
    carryover: Option<Carryover>,
    random: Option<Box<dyn RandomSource>>,
    level: Option<Level>,
}

impl SessionBuilder {
    pub fn timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    /// Lives, streak and shield carried over from a previous stage.
    pub fn carryover(mut self, carryover: Carryover) -> Self {
        self.carryover = Some(carryover);
        self
    }

    pub fn random_source(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn start(self) -> Result<QuizSession, QuizError> {
        if self.questions.is_empty() {
            tracing::warn!("Refusing to start quiz session: question set is empty");
            return Err(QuizError::NoQuestionsAvailable);
        }

        let carryover = self
            .carryover
            .unwrap_or_else(|| Carryover::fresh(self.game.initial_lives));
        if carryover.lives == 0 {
            return Err(QuizError::InvalidState {
                state: SessionState::GameOver.as_str(),
                event: "start",
            });
        }

        let random = self.random.unwrap_or_else(|| Box::new(ThreadRandom));
        let budget = TimeBudget::seeded(&self.questions, &self.timing);
        let remaining_seconds = budget.seconds_for(0).unwrap_or(0);

        let session = QuizSession {
            id: Uuid::new_v4(),
            level: self.level,
            bonus_policy: BonusPolicy::from_config(&self.game, random),
            questions: self.questions,
            budget,
            state: SessionState::AwaitingAnswer,
            current_index: 0,
            score: 0,
            lives: carryover.lives,
            consecutive_correct: carryover.consecutive_correct,
            second_chance_available: carryover.second_chance_available,
            remaining_seconds,
            response_times: Vec::new(),
            bonuses: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        };

        metrics::record_session_started();
        tracing::info!(
            "Quiz session started: {} with {} questions, lives={}, level={:?}",
            session.id,
            session.questions.len(),
            session.lives,
            session.level.map(|l| l.code())
        );

        Ok(session)
    }
}

/// One play-through of a question set.
///
/// Driven by exactly one host through [`tick`](Self::tick) and
/// [`answer`](Self::answer). Every call either returns the events it caused
/// or a rejection that left the session unchanged.
#[derive(Debug)]
pub struct QuizSession {
    id: Uuid,
    level: Option<Level>,
    questions: QuestionSet,
    budget: TimeBudget,
    bonus_policy: BonusPolicy,
    state: SessionState,
    current_index: usize,
    score: u32,
    lives: u32,
    consecutive_correct: u32,
    second_chance_available: bool,
    remaining_seconds: u32,
    response_times: Vec<u32>,
    bonuses: Vec<BonusKind>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    pub fn builder(questions: impl Into<QuestionSet>) -> SessionBuilder {
        SessionBuilder {
            questions: questions.into(),
            timing: TimingConfig::default(),
            game: GameConfig::default(),
            carryover: None,
            random: None,
            level: None,
        }
    }

    /// One second elapsed on the active question.
    pub fn tick(&mut self) -> Result<Vec<SessionEvent>, QuizError> {
        self.ensure_awaiting("tick")?;

        // Reaching zero resolves in the same call, so the countdown never goes negative
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return Ok(vec![SessionEvent::TimeUpdated {
                remaining_seconds: self.remaining_seconds,
            }]);
        }

        tracing::debug!(
            "Question {} timed out in session {}",
            self.current_index,
            self.id
        );
        let mut events = vec![SessionEvent::TimeExpired {
            question_index: self.current_index,
        }];
        let allotted = self.allotted_seconds();
        self.resolve(Resolution::Timeout, allotted, &mut events);
        Ok(events)
    }

    /// The player picked option `option_index` (0 = A) on the active question.
    pub fn answer(&mut self, option_index: usize) -> Result<Vec<SessionEvent>, QuizError> {
        self.ensure_awaiting("answer")?;

        if option_index >= OPTION_COUNT {
            tracing::warn!(
                "Rejected option {} for session {}: out of range",
                option_index,
                self.id
            );
            return Err(QuizError::InvalidInput {
                option_index,
                option_count: OPTION_COUNT,
            });
        }

        let question = self
            .questions
            .get(self.current_index)
            .ok_or(QuizError::InvalidState {
                state: self.state.as_str(),
                event: "answer",
            })?;
        let outcome = answer_evaluator::evaluate(question, option_index)?;

        let response_seconds = self
            .allotted_seconds()
            .saturating_sub(self.remaining_seconds);
        tracing::debug!(
            "Answer for question {} in session {}: option={}, outcome={:?}, response={}s",
            self.current_index,
            self.id,
            option_index,
            outcome,
            response_seconds
        );

        let resolution = match outcome {
            AnswerOutcome::Correct => Resolution::Correct,
            AnswerOutcome::Incorrect => Resolution::WrongAnswer,
        };
        let mut events = Vec::new();
        self.resolve(resolution, response_seconds, &mut events);
        Ok(events)
    }

    /// Like [`tick`](Self::tick), but rejected unless `question_index` is
    /// still the active question.
    pub fn tick_for(&mut self, question_index: usize) -> Result<Vec<SessionEvent>, QuizError> {
        self.ensure_addressed(question_index, "stale tick")?;
        self.tick()
    }

    /// Like [`answer`](Self::answer), but rejected unless `question_index`
    /// is still the active question. Catches stale callbacks that arrive
    /// after a timeout already resolved the question.
    pub fn answer_for(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<Vec<SessionEvent>, QuizError> {
        self.ensure_addressed(question_index, "stale answer")?;
        self.answer(option_index)
    }

    fn ensure_awaiting(&self, event: &'static str) -> Result<(), QuizError> {
        if self.state == SessionState::AwaitingAnswer {
            return Ok(());
        }
        tracing::warn!(
            "Rejected {} for session {}: state={}",
            event,
            self.id,
            self.state.as_str()
        );
        Err(QuizError::InvalidState {
            state: self.state.as_str(),
            event,
        })
    }

    fn ensure_addressed(&self, question_index: usize, event: &'static str) -> Result<(), QuizError> {
        self.ensure_awaiting(event)?;
        if question_index == self.current_index {
            return Ok(());
        }
        tracing::warn!(
            "Rejected {} for session {}: addressed question {}, active question {}",
            event,
            self.id,
            question_index,
            self.current_index
        );
        Err(QuizError::InvalidState {
            state: self.state.as_str(),
            event,
        })
    }

    fn resolve(
        &mut self,
        resolution: Resolution,
        response_seconds: u32,
        events: &mut Vec<SessionEvent>,
    ) {
        self.state = SessionState::Resolving;
        self.response_times.push(response_seconds);
        metrics::record_resolution(resolution, response_seconds);

        match resolution {
            Resolution::Correct => {
                self.score += 1;
                self.consecutive_correct += 1;

                let allotted = self.allotted_seconds();
                if let Some(kind) =
                    self.bonus_policy
                        .evaluate(self.consecutive_correct, response_seconds, allotted)
                {
                    self.apply_bonus(kind);
                    events.push(SessionEvent::BonusGranted { kind });
                }

                events.push(SessionEvent::AnswerOutcome {
                    question_index: self.current_index,
                    outcome: AnswerOutcome::Correct,
                });
                self.advance(events);
            }
            Resolution::WrongAnswer | Resolution::Timeout => {
                // A timeout follows its TimeExpired with the same outcome as a wrong answer
                events.push(SessionEvent::AnswerOutcome {
                    question_index: self.current_index,
                    outcome: AnswerOutcome::Incorrect,
                });

                // The streak ends even when the life loss is absorbed
                self.consecutive_correct = 0;

                if self.second_chance_available {
                    self.second_chance_available = false;
                    metrics::SECOND_CHANCES_USED_TOTAL.inc();
                    tracing::info!(
                        "Second chance used in session {} on question {}",
                        self.id,
                        self.current_index
                    );
                    events.push(SessionEvent::SecondChanceUsed);
                    self.advance(events);
                    return;
                }

                self.lives = self.lives.saturating_sub(1);
                metrics::LIVES_LOST_TOTAL.inc();
                events.push(SessionEvent::LifeLost {
                    lives_remaining: self.lives,
                });

                if self.lives == 0 {
                    self.finish(SessionState::GameOver);
                    events.push(SessionEvent::SessionFailed {
                        final_score: self.score,
                    });
                } else {
                    self.advance(events);
                }
            }
        }
    }

    fn apply_bonus(&mut self, kind: BonusKind) {
        // A bonus spends the streak
        self.consecutive_correct = 0;
        self.bonuses.push(kind);
        metrics::record_bonus(kind);

        match kind {
            BonusKind::ExtraLife => self.lives += 1,
            BonusKind::SecondChance => self.second_chance_available = true,
            BonusKind::ExtraTime => {
                let extra = self.bonus_policy.extra_time_seconds();
                self.budget.extend(self.current_index + 1, extra);
            }
        }

        tracing::info!(
            "Bonus granted in session {}: {} (lives={}, second_chance={})",
            self.id,
            kind.as_str(),
            self.lives,
            self.second_chance_available
        );
    }

    fn advance(&mut self, events: &mut Vec<SessionEvent>) {
        self.current_index += 1;

        if self.current_index >= self.questions.len() {
            self.finish(SessionState::Completed);
            events.push(SessionEvent::SessionCompleted {
                final_score: self.score,
            });
            return;
        }

        self.remaining_seconds = self.allotted_seconds();
        self.state = SessionState::AwaitingAnswer;
        events.push(SessionEvent::QuestionStarted {
            question_index: self.current_index,
            allotted_seconds: self.remaining_seconds,
        });
    }

    fn finish(&mut self, state: SessionState) {
        self.state = state;
        self.finished_at = Some(Utc::now());

        let status = match state {
            SessionState::GameOver => SummaryStatus::GameOver,
            _ => SummaryStatus::Completed,
        };
        metrics::record_session_finished(status);

        tracing::info!(
            "Quiz session {}: {} score={}/{} lives={}",
            status.as_str(),
            self.id,
            self.score,
            self.questions.len(),
            self.lives
        );
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn level(&self) -> Option<Level> {
        self.level
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The active question, or `None` once the session is terminal.
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_terminal() {
            return None;
        }
        self.questions.get(self.current_index)
    }

    /// `QuestionStarted` for the active question. Hosts use it to render
    /// the first question, which no input has announced yet.
    pub fn question_started(&self) -> Option<SessionEvent> {
        self.current_question()
            .map(|_| SessionEvent::QuestionStarted {
                question_index: self.current_index,
                allotted_seconds: self.allotted_seconds(),
            })
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn consecutive_correct(&self) -> u32 {
        self.consecutive_correct
    }

    pub fn second_chance_available(&self) -> bool {
        self.second_chance_available
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Budget of the active question.
    pub fn allotted_seconds(&self) -> u32 {
        self.budget.seconds_for(self.current_index).unwrap_or(0)
    }

    pub fn time_budget(&self) -> &TimeBudget {
        &self.budget
    }

    pub fn response_times(&self) -> &[u32] {
        &self.response_times
    }

    pub fn bonuses(&self) -> &[BonusKind] {
        &self.bonuses
    }

    /// State to hand to the next stage of a campaign.
    pub fn carryover(&self) -> Carryover {
        Carryover {
            lives: self.lives,
            consecutive_correct: self.consecutive_correct,
            second_chance_available: self.second_chance_available,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let status = match self.state {
            SessionState::Completed => SummaryStatus::Completed,
            SessionState::GameOver => SummaryStatus::GameOver,
            SessionState::AwaitingAnswer | SessionState::Resolving => SummaryStatus::Abandoned,
        };

        SessionSummary {
            session_id: self.id,
            level: self.level,
            status,
            score: self.score,
            question_count: self.questions.len(),
            questions_resolved: self.response_times.len(),
            lives: self.lives,
            response_times: self.response_times.clone(),
            bonuses: self.bonuses.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        // Terminal sessions already recorded their finish
        if !self.is_terminal() {
            metrics::record_session_finished(SummaryStatus::Abandoned);
            tracing::debug!("Quiz session {} dropped before finishing", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Difficulty, OptionLetter};

    struct Always(usize);

    impl RandomSource for Always {
        fn pick(&mut self, _upper: usize) -> usize {
            self.0
        }
    }

    fn questions(count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| Question {
                id: format!("q{}", i),
                prompt: format!("Question {}", i),
                options: [
                    "first".to_string(),
                    "second".to_string(),
                    "third".to_string(),
                    "fourth".to_string(),
                ],
                category: Category::Culture,
                difficulty: Difficulty::Expert,
                correct: OptionLetter::B,
            })
            .collect()
    }

    #[test]
    fn starts_on_first_question_with_full_budget() {
        let session = QuizSession::builder(questions(2)).start().unwrap();
        assert_eq!(session.state(), SessionState::AwaitingAnswer);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.remaining_seconds(), 30);
        assert_eq!(session.lives(), 3);
        assert_eq!(
            session.question_started(),
            Some(SessionEvent::QuestionStarted {
                question_index: 0,
                allotted_seconds: 30
            })
        );
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = QuizSession::builder(Vec::<Question>::new()).start().unwrap_err();
        assert_eq!(err, QuizError::NoQuestionsAvailable);
    }

    #[test]
    fn zero_lives_carryover_is_rejected() {
        let result = QuizSession::builder(questions(1))
            .carryover(Carryover::fresh(0))
            .start();
        assert!(matches!(result, Err(QuizError::InvalidState { .. })));
    }

    #[test]
    fn extra_time_extends_next_question_only() {
        let mut session = QuizSession::builder(questions(3))
            .carryover(Carryover {
                lives: 3,
                consecutive_correct: 2,
                second_chance_available: false,
            })
            .random_source(Always(2))
            .start()
            .unwrap();

        let events = session.answer(1).unwrap();
        assert_eq!(
            events,
            vec![
                SessionEvent::BonusGranted {
                    kind: BonusKind::ExtraTime
                },
                SessionEvent::AnswerOutcome {
                    question_index: 0,
                    outcome: AnswerOutcome::Correct
                },
                SessionEvent::QuestionStarted {
                    question_index: 1,
                    allotted_seconds: 40
                },
            ]
        );
        assert_eq!(session.remaining_seconds(), 40);
        assert_eq!(session.time_budget().seconds_for(0), Some(30));
        assert_eq!(session.time_budget().seconds_for(2), Some(30));
        assert_eq!(session.consecutive_correct(), 0);
    }

    #[test]
    fn summary_of_unfinished_session_is_abandoned() {
        let mut session = QuizSession::builder(questions(3)).start().unwrap();
        session.answer(1).unwrap();
        let summary = session.summary();
        assert_eq!(summary.status, SummaryStatus::Abandoned);
        assert_eq!(summary.questions_resolved, 1);
        assert_eq!(summary.finished_at, None);
    }
}

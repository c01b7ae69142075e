use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod answer;
pub mod event;
pub mod question;

pub use answer::{AnswerOutcome, OptionLetter, Resolution};
pub use event::{BonusKind, SessionEvent};
pub use question::{Category, Difficulty, Level, Question, QuestionRecord, QuestionSet};

/// State handed from one stage of a campaign to the next. A cohort keeps
/// its remaining lives (and any unspent streak or shield) between games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carryover {
    pub lives: u32,
    pub consecutive_correct: u32,
    pub second_chance_available: bool,
}

impl Carryover {
    pub fn fresh(initial_lives: u32) -> Self {
        Self {
            lives: initial_lives,
            consecutive_correct: 0,
            second_chance_available: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    Completed,
    GameOver,
    Abandoned,
}

impl SummaryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStatus::Completed => "completed",
            SummaryStatus::GameOver => "game_over",
            SummaryStatus::Abandoned => "abandoned",
        }
    }
}

/// Read-only snapshot of a session, shaped for whoever persists results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub level: Option<Level>,
    pub status: SummaryStatus,
    pub score: u32,
    pub question_count: usize,
    pub questions_resolved: usize,
    pub lives: u32,
    pub response_times: Vec<u32>,
    pub bonuses: Vec<BonusKind>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SessionSummary {
    /// Share of resolved questions answered correctly, in percent.
    pub fn accuracy(&self) -> f64 {
        if self.questions_resolved == 0 {
            return 0.0;
        }
        (self.score as f64 / self.questions_resolved as f64) * 100.0
    }
}

#![allow(dead_code)]

use std::collections::VecDeque;

use quiz_engine::models::{Carryover, Category, Difficulty, OptionLetter, Question};
use quiz_engine::services::bonus_policy::RandomSource;
use quiz_engine::QuizSession;

/// Option index every fixture question accepts.
pub const CORRECT: usize = 1;
/// Option index every fixture question rejects.
pub const WRONG: usize = 3;
/// Budget of an expert question under the default timing table.
pub const EXPERT_SECONDS: u32 = 30;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Hands out preset picks in order, then falls back to 0.
pub struct ScriptedRandom {
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(picks: &[usize]) -> Self {
        Self {
            picks: picks.iter().copied().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, upper: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % upper
    }
}

pub fn question(id: &str) -> Question {
    Question {
        id: id.to_string(),
        prompt: format!("Question {}", id),
        options: [
            "Maracatu".to_string(),
            "Frevo".to_string(),
            "Samba de roda".to_string(),
            "Carimbo".to_string(),
        ],
        category: Category::Culture,
        difficulty: Difficulty::Expert,
        correct: OptionLetter::B,
    }
}

pub fn questions(count: usize) -> Vec<Question> {
    (0..count).map(|i| question(&format!("q{}", i))).collect()
}

pub fn carryover(lives: u32, consecutive_correct: u32, second_chance_available: bool) -> Carryover {
    Carryover {
        lives,
        consecutive_correct,
        second_chance_available,
    }
}

/// Session over `count` expert questions with a scripted bonus roll.
pub fn start_session(count: usize, carryover: Carryover, picks: &[usize]) -> QuizSession {
    init_tracing();
    QuizSession::builder(questions(count))
        .carryover(carryover)
        .random_source(ScriptedRandom::new(picks))
        .start()
        .expect("fixture session should start")
}

/// Delivers `count` ticks and returns the events of the last one.
pub fn tick_times(session: &mut QuizSession, count: u32) -> Vec<quiz_engine::models::SessionEvent> {
    let mut last = Vec::new();
    for _ in 0..count {
        last = session.tick().expect("tick should be accepted");
    }
    last
}

use serde::Deserialize;
use std::env;
use validator::Validate;

use crate::models::{Difficulty, Level};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub timing: TimingConfig,
    #[validate(nested)]
    pub game: GameConfig,
    pub question_bank: QuestionBankConfig,
}

/// Seconds allotted per question for each difficulty tier. Harder tiers get
/// less time.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TimingConfig {
    #[validate(range(min = 1))]
    pub easy_seconds: u32,
    #[validate(range(min = 1))]
    pub medium_seconds: u32,
    #[validate(range(min = 1))]
    pub hard_seconds: u32,
    #[validate(range(min = 1))]
    pub expert_seconds: u32,
    #[validate(range(min = 1))]
    pub tick_interval_ms: u64,
}

impl TimingConfig {
    pub fn base_seconds_for(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy_seconds,
            Difficulty::Medium => self.medium_seconds,
            Difficulty::Hard => self.hard_seconds,
            Difficulty::Expert => self.expert_seconds,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            easy_seconds: 120,
            medium_seconds: 90,
            hard_seconds: 60,
            expert_seconds: 30,
            tick_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GameConfig {
    #[validate(range(min = 1))]
    pub initial_lives: u32,
    /// Consecutive correct answers needed before a bonus can be offered.
    #[validate(range(min = 1))]
    pub bonus_streak: u32,
    #[validate(range(min = 1))]
    pub extra_time_seconds: u32,
    #[validate(range(min = 1))]
    pub questions_per_session: usize,
    /// Level code, `"<difficulty>-<category>"`.
    pub level: String,
}

impl GameConfig {
    pub fn level(&self) -> Result<Level, String> {
        self.level.parse()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            bonus_streak: 3,
            extra_time_seconds: 10,
            questions_per_session: 10,
            level: "1-3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionBankConfig {
    pub path: String,
}

impl Default for QuestionBankConfig {
    fn default() -> Self {
        Self {
            path: "data/questions.json".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            game: GameConfig::default(),
            question_bank: QuestionBankConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Local .env is optional
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
        let defaults = Config::default();

        // Defaults, then config/<env>.toml, then APP_ overrides
        let settings = config::Config::builder()
            .set_default("timing.easy_seconds", defaults.timing.easy_seconds)?
            .set_default("timing.medium_seconds", defaults.timing.medium_seconds)?
            .set_default("timing.hard_seconds", defaults.timing.hard_seconds)?
            .set_default("timing.expert_seconds", defaults.timing.expert_seconds)?
            .set_default("timing.tick_interval_ms", defaults.timing.tick_interval_ms)?
            .set_default("game.initial_lives", defaults.game.initial_lives)?
            .set_default("game.bonus_streak", defaults.game.bonus_streak)?
            .set_default("game.extra_time_seconds", defaults.game.extra_time_seconds)?
            .set_default(
                "game.questions_per_session",
                defaults.game.questions_per_session as u64,
            )?
            .set_default("game.level", defaults.game.level.clone())?
            .set_default("question_bank.path", defaults.question_bank.path.clone())?
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;

        config
            .validate()
            .map_err(|e| config::ConfigError::Message(format!("Invalid configuration: {}", e)))?;
        config
            .game
            .level()
            .map_err(|e| config::ConfigError::Message(format!("Invalid configuration: {}", e)))?;

        Ok(config)
    }
}

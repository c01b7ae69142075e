use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::{Validate, ValidationError};

use super::answer::OptionLetter;

/// Number of options every question carries (positions A-D).
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Numeric code used by the question bank (1 = easiest).
    pub fn code(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::Expert => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.code() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code).ok_or_else(|| format!("Invalid difficulty: {}", value));
        }
        match trimmed.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(format!("Invalid difficulty: {}", value)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject tag a question belongs to. Storage codes start at 3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Art,
    Culture,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Food, Category::Art, Category::Culture];

    pub fn code(&self) -> u8 {
        match self {
            Category::Food => 3,
            Category::Art => 4,
            Category::Culture => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Art => "art",
            Category::Culture => "culture",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code).ok_or_else(|| format!("Invalid category: {}", value));
        }
        match trimmed.to_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "art" => Ok(Category::Art),
            "culture" => Ok(Category::Culture),
            _ => Err(format!("Invalid category: {}", value)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A playable stage: one difficulty tier within one category.
///
/// The textual form is `"<difficulty code>-<category code>"`, e.g. `"2-4"`
/// for medium art questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Level {
    pub difficulty: Difficulty,
    pub category: Category,
}

impl Level {
    pub fn new(difficulty: Difficulty, category: Category) -> Self {
        Self {
            difficulty,
            category,
        }
    }

    pub fn code(&self) -> String {
        format!("{}-{}", self.difficulty.code(), self.category.code())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (difficulty, category) = value
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Invalid level code: {}", value))?;

        let difficulty = difficulty
            .parse::<u8>()
            .ok()
            .and_then(Difficulty::from_code)
            .ok_or_else(|| format!("Invalid level code: {}", value))?;
        let category = category
            .parse::<u8>()
            .ok()
            .and_then(Category::from_code)
            .ok_or_else(|| format!("Invalid level code: {}", value))?;

        Ok(Level::new(difficulty, category))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

/// A single multiple-choice item. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub category: Category,
    pub difficulty: Difficulty,
    pub correct: OptionLetter,
}

impl Question {
    pub fn option(&self, letter: OptionLetter) -> &str {
        &self.options[letter.index()]
    }

    pub fn level(&self) -> Level {
        Level::new(self.difficulty, self.category)
    }
}

/// Question as it appears in a question bank file, before validation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionRecord {
    #[validate(length(min = 1, max = 64, message = "Question id must be 1-64 characters"))]
    pub id: String,

    #[validate(length(min = 1, message = "Question prompt must not be empty"))]
    pub prompt: String,

    #[validate(custom(function = "validate_options"))]
    pub options: [String; OPTION_COUNT],

    pub category: Category,
    pub difficulty: Difficulty,
    pub answer: OptionLetter,
}

fn validate_options(options: &[String; OPTION_COUNT]) -> Result<(), ValidationError> {
    if options.iter().any(|option| option.trim().is_empty()) {
        let mut err = ValidationError::new("empty_option");
        err.message = Some("Every option must have text".into());
        return Err(err);
    }
    Ok(())
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        Question {
            id: record.id,
            prompt: record.prompt,
            options: record.options,
            category: record.category,
            difficulty: record.difficulty,
            correct: record.answer,
        }
    }
}

/// Ordered questions for one play-through. The order never changes once
/// built; shuffling is the provider's job.
#[derive(Debug, Clone, Default)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl From<Vec<Question>> for QuestionSet {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}

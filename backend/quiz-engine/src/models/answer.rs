use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::question::OPTION_COUNT;

/// Option position on a question card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; OPTION_COUNT] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    /// 0-based option index.
    pub fn index(&self) -> usize {
        match self {
            OptionLetter::A => 0,
            OptionLetter::B => 1,
            OptionLetter::C => 2,
            OptionLetter::D => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl FromStr for OptionLetter {
    type Err = String;

    /// Accepts a letter (`"b"`, `"B"`) or a 1-based position (`"2"`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "A" | "1" => Ok(OptionLetter::A),
            "B" | "2" => Ok(OptionLetter::B),
            "C" | "3" => Ok(OptionLetter::C),
            "D" | "4" => Ok(OptionLetter::D),
            _ => Err(format!("Invalid option: {}", value)),
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            OptionLetter::A => "A",
            OptionLetter::B => "B",
            OptionLetter::C => "C",
            OptionLetter::D => "D",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

/// Why a question was resolved the way it was. Used for metrics labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Correct,
    WrongAnswer,
    Timeout,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Correct => "correct",
            Resolution::WrongAnswer => "incorrect",
            Resolution::Timeout => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_letter_parses_letters_and_positions() {
        assert_eq!("c".parse::<OptionLetter>(), Ok(OptionLetter::C));
        assert_eq!(" 4 ".parse::<OptionLetter>(), Ok(OptionLetter::D));
        assert!("e".parse::<OptionLetter>().is_err());
        assert!("0".parse::<OptionLetter>().is_err());
    }

    #[test]
    fn option_letter_index_matches_position() {
        for (index, letter) in OptionLetter::ALL.iter().enumerate() {
            assert_eq!(letter.index(), index);
            assert_eq!(OptionLetter::from_index(index), Some(*letter));
        }
        assert_eq!(OptionLetter::from_index(OPTION_COUNT), None);
    }
}
